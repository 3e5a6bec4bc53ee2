pub(crate) mod negotiator;
pub(crate) mod peer_session;
pub(crate) mod rtc_endpoint;
pub(crate) mod signal_driver;
pub(crate) mod status;


pub(crate) use peer_session::PeerSession;
