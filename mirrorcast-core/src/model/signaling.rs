use crate::model::room::RoomKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One signaling frame. JSON-object framed, tagged by the `type` field.
///
/// `offer`/`answer`/`ice` payloads are opaque to the relay: it routes on
/// the tag and forwards the original frame text untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SignalMessage {
    Join {
        // Missing `roomId` decodes as an empty key; rejecting it is the
        // relay's call, not a parse error.
        #[serde(rename = "roomId", default)]
        room: RoomKey,
    },
    Joined {
        #[serde(rename = "roomId")]
        room: RoomKey,
    },
    Offer {
        sdp: String,
    },
    Answer {
        sdp: String,
    },
    Ice {
        candidate: serde_json::Value,
    },
    Error {
        reason: ErrorReason,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    InvalidJson,
    MissingRoomId,
    JoinFirst,
    UnknownType,
}

impl ErrorReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidJson => "invalid_json",
            Self::MissingRoomId => "missing_room_id",
            Self::JoinFirst => "join_first",
            Self::UnknownType => "unknown_type",
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum DecodeError {
    #[error("frame is not a well-formed signaling message")]
    InvalidJson,
    #[error("unrecognized message type")]
    UnknownType,
}

impl SignalMessage {
    /// Decode one inbound frame, classifying failures the way the relay
    /// reports them: text that is not JSON, or a known type with
    /// malformed fields, is `InvalidJson`; valid JSON without a
    /// recognized `type` tag is `UnknownType`. Unknown extra fields are
    /// ignored.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|_| DecodeError::InvalidJson)?;

        let tag_known = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .is_some_and(known_type);

        match serde_json::from_value::<Self>(value) {
            Ok(msg) => Ok(msg),
            Err(_) if tag_known => Err(DecodeError::InvalidJson),
            Err(_) => Err(DecodeError::UnknownType),
        }
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn known_type(tag: &str) -> bool {
    matches!(
        tag,
        "join" | "joined" | "offer" | "answer" | "ice" | "error"
    )
}
