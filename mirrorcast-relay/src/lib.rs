mod room;
mod signaling;

pub use room::{ConnectionId, RoomRegistry};
pub use signaling::{RelayService, router, ws_handler};
