use mirrorcast_core::RoomKey;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STUN_SERVER: &str = "stun:stun.l.google.com:19302";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl Default for IceServerConfig {
    fn default() -> Self {
        Self {
            urls: vec![DEFAULT_STUN_SERVER.to_string()],
            username: None,
            credential: None,
        }
    }
}

/// Everything one session needs: where the relay is, which room to
/// join, and which ICE servers the peer connection may use.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub url: String,
    pub room: RoomKey,
    pub ice_servers: Vec<IceServerConfig>,
}

impl SessionConfig {
    pub fn new(url: impl Into<String>, room: impl Into<RoomKey>) -> Self {
        Self {
            url: url.into(),
            room: room.into(),
            ice_servers: vec![IceServerConfig::default()],
        }
    }
}
