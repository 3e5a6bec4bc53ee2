use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque key naming a signaling room. Serialized on the wire as the
/// `roomId` field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct RoomKey(String);

impl RoomKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RoomKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RoomKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
