use mirrorcast_core::RoomKey;
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Relay-side identity of one signaling connection. Never leaves the
/// process; clients are anonymous on the wire.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the relay knows about one live connection: where to write
/// outbound frames, and which room it currently belongs to (at most
/// one).
pub(crate) struct ConnectionEntry {
    pub(crate) tx: mpsc::UnboundedSender<String>,
    pub(crate) room: Option<RoomKey>,
}
