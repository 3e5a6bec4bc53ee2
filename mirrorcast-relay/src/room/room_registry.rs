use crate::room::{ConnectionEntry, ConnectionId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use mirrorcast_core::RoomKey;
use std::collections::HashSet;
use tokio::sync::mpsc;
use tracing::info;

/// Shared registry of live connections and the rooms they form.
///
/// Rooms are independent: every mutation touches at most one room
/// entry, and dashmap serializes access per entry, so joins and leaves
/// on the same key never corrupt the member set while operations on
/// different rooms never contend. A connection's own record is only
/// mutated from its handler task, one message at a time.
pub struct RoomRegistry {
    connections: DashMap<ConnectionId, ConnectionEntry>,
    rooms: DashMap<RoomKey, HashSet<ConnectionId>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    /// Register a freshly accepted connection with no room membership.
    pub fn register(&self, tx: mpsc::UnboundedSender<String>) -> ConnectionId {
        let id = ConnectionId::new();
        self.connections.insert(id, ConnectionEntry { tx, room: None });
        id
    }

    /// Drop a connection and its room membership. Safe to call more
    /// than once for the same id; later calls find nothing to do.
    pub fn unregister(&self, id: ConnectionId) -> Option<RoomKey> {
        let (_, entry) = self.connections.remove(&id)?;
        if let Some(room) = entry.room.as_ref() {
            self.leave(id, room);
        }
        entry.room
    }

    /// Move a connection into `room`, leaving its prior room first if
    /// it had one. Returns false if the connection is not registered.
    pub fn join(&self, id: ConnectionId, room: RoomKey) -> bool {
        let prior = {
            let Some(mut entry) = self.connections.get_mut(&id) else {
                return false;
            };
            std::mem::replace(&mut entry.room, Some(room.clone()))
        };

        if let Some(old) = prior {
            if old != room {
                self.leave(id, &old);
            }
        }

        match self.rooms.entry(room) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().insert(id);
            }
            Entry::Vacant(vacant) => {
                info!("Creating new room: {}", vacant.key());
                vacant.insert(HashSet::from([id]));
            }
        }
        true
    }

    fn leave(&self, id: ConnectionId, room: &RoomKey) {
        if let Some(mut members) = self.rooms.get_mut(room) {
            members.remove(&id);
        }
        if self.rooms.remove_if(room, |_, members| members.is_empty()).is_some() {
            info!("Destroying empty room: {}", room);
        }
    }

    pub fn room_of(&self, id: ConnectionId) -> Option<RoomKey> {
        self.connections.get(&id)?.room.clone()
    }

    /// Snapshot of a room's members excluding `sender`, taken under the
    /// room's entry lock so a concurrent join/leave sees either the old
    /// or the new set, never a torn one.
    pub fn members_except(&self, room: &RoomKey, sender: ConnectionId) -> Vec<ConnectionId> {
        match self.rooms.get(room) {
            Some(members) => members.iter().filter(|id| **id != sender).copied().collect(),
            None => Vec::new(),
        }
    }

    /// Best-effort write of one frame. Returns false when the target is
    /// gone or its send half is closed; the caller decides whether that
    /// is worth a log line.
    pub fn send_to(&self, id: ConnectionId, frame: String) -> bool {
        match self.connections.get(&id) {
            Some(entry) => entry.tx.send(frame).is_ok(),
            None => false,
        }
    }

    pub fn contains_room(&self, room: &RoomKey) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn room_size(&self, room: &RoomKey) -> Option<usize> {
        self.rooms.get(room).map(|members| members.len())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
