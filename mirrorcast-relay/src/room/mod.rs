mod connection;
mod room_registry;

pub use connection::ConnectionId;
pub(crate) use connection::ConnectionEntry;
pub use room_registry::RoomRegistry;
