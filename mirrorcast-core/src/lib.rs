pub mod model;

pub use model::{DecodeError, ErrorReason, RoomKey, SignalMessage};
