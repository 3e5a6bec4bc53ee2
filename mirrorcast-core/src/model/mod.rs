mod room;
mod signaling;

pub use room::RoomKey;
pub use signaling::{DecodeError, ErrorReason, SignalMessage};
