use crate::room::{ConnectionId, RoomRegistry};
use mirrorcast_core::{DecodeError, ErrorReason, RoomKey, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Protocol layer of the relay: decodes inbound frames, validates them
/// against the connection's membership, and forwards signaling payloads
/// to the rest of the room.
///
/// The relay is a dumb pipe. It routes on the `type` tag only and
/// rebroadcasts the original frame text verbatim, so SDP and ICE
/// payloads pass through byte-for-byte.
#[derive(Clone)]
pub struct RelayService {
    registry: Arc<RoomRegistry>,
}

impl RelayService {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RoomRegistry::new()),
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Register a newly accepted connection. `tx` is the handle the
    /// relay will use for every frame addressed to this connection.
    pub fn register(&self, tx: mpsc::UnboundedSender<String>) -> ConnectionId {
        self.registry.register(tx)
    }

    /// Tear down a connection on close or transport error. Idempotent.
    pub fn disconnect(&self, id: ConnectionId) {
        if let Some(room) = self.registry.unregister(id) {
            info!("Connection {} left room '{}'", id, room);
        }
    }

    /// Handle one inbound text frame from `id`, in arrival order.
    pub fn handle_frame(&self, id: ConnectionId, text: &str) {
        match SignalMessage::decode(text) {
            Ok(SignalMessage::Join { room }) => self.handle_join(id, room),
            Ok(
                SignalMessage::Offer { .. }
                | SignalMessage::Answer { .. }
                | SignalMessage::Ice { .. },
            ) => self.forward(id, text),
            // Relay-originated types are not valid inbound.
            Ok(SignalMessage::Joined { .. } | SignalMessage::Error { .. }) => {
                self.reply_error(id, ErrorReason::UnknownType);
            }
            Err(DecodeError::InvalidJson) => self.reply_error(id, ErrorReason::InvalidJson),
            Err(DecodeError::UnknownType) => self.reply_error(id, ErrorReason::UnknownType),
        }
    }

    fn handle_join(&self, id: ConnectionId, room: RoomKey) {
        if room.is_empty() {
            self.reply_error(id, ErrorReason::MissingRoomId);
            return;
        }

        if !self.registry.join(id, room.clone()) {
            warn!("Join from unregistered connection {}", id);
            return;
        }

        info!("Connection {} joined room '{}'", id, room);
        self.reply(id, &SignalMessage::Joined { room });
    }

    /// Broadcast the original frame to every other member of the
    /// sender's room. Best-effort per member: a closed transport is
    /// skipped without affecting delivery to the rest, and nothing is
    /// retried.
    fn forward(&self, id: ConnectionId, frame: &str) {
        let Some(room) = self.registry.room_of(id) else {
            self.reply_error(id, ErrorReason::JoinFirst);
            return;
        };

        for member in self.registry.members_except(&room, id) {
            if !self.registry.send_to(member, frame.to_owned()) {
                debug!("Skipping unsendable member {} of room '{}'", member, room);
            }
        }
    }

    fn reply_error(&self, id: ConnectionId, reason: ErrorReason) {
        warn!("Protocol error from connection {}: {}", id, reason);
        self.reply(id, &SignalMessage::Error { reason });
    }

    fn reply(&self, id: ConnectionId, msg: &SignalMessage) {
        match msg.encode() {
            Ok(frame) => {
                if !self.registry.send_to(id, frame) {
                    debug!("Reply to {} dropped; connection gone", id);
                }
            }
            Err(e) => error!("Failed to serialize signal message: {}", e),
        }
    }
}

impl Default for RelayService {
    fn default() -> Self {
        Self::new()
    }
}
