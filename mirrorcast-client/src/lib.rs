mod client;
mod config;
mod error;
mod session;
mod sink;

pub use client::ReceiverClient;
pub use config::{DEFAULT_STUN_SERVER, IceServerConfig, SessionConfig};
pub use error::{NegotiationError, SessionError};
pub use session::negotiator::{Negotiator, PeerEndpoint};
pub use session::status::{SessionPhase, SessionStatus};
pub use sink::{LogSink, MediaSink};
