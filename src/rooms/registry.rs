//! Process-wide registry mapping room id to room.
//!
//! Explicitly owned (constructed in main, shared via `Arc`), never an
//! ambient singleton, so every test can build a fresh one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::rooms::error::RoomError;
use crate::rooms::room::Room;
use crate::rooms::stream::ListenerStream;

/// Ids start above this offset and count up; they are opaque tokens to
/// callers, unique for the life of the registry and free of path
/// separators.
const ID_SEED: u64 = 10_000;

pub struct RoomRegistry {
    rooms: DashMap<String, Room>,
    next_id: AtomicU64,
}

/// Read-only diagnostic view of the registry.
#[derive(Debug, Serialize)]
pub struct RegistrySnapshot {
    #[serde(rename = "roomCount")]
    pub room_count: usize,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            next_id: AtomicU64::new(ID_SEED),
        }
    }

    fn next_token(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("U{n}")
    }

    /// Create a room protected by `password` and return its id. The
    /// boundary layer rejects empty passwords before calling this.
    pub fn create_room(&self, password: &str) -> String {
        let id = self.next_token();
        self.rooms.insert(id.clone(), Room::new(id.clone(), password.to_string()));
        tracing::info!(room_id = %id, "Room created");
        id
    }

    /// Run `f` against the room, or `NotFound`. Pure lookup, no side
    /// effects beyond what `f` does.
    pub fn with_room<T>(&self, id: &str, f: impl FnOnce(&Room) -> T) -> Result<T, RoomError> {
        match self.rooms.get(id) {
            Some(room) => Ok(f(&room)),
            None => Err(RoomError::NotFound),
        }
    }

    /// Mutable variant of [`with_room`](Self::with_room). The entry lock is
    /// held for the duration of `f`, which also serializes access to the
    /// room's listener map.
    pub fn with_room_mut<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Room) -> T,
    ) -> Result<T, RoomError> {
        match self.rooms.get_mut(id) {
            Some(mut room) => Ok(f(&mut room)),
            None => Err(RoomError::NotFound),
        }
    }

    /// Attach a new listener to the room and return its streaming handle.
    /// The `:connected` priming frame is queued before this returns, so it
    /// precedes every broadcast issued afterwards.
    pub fn subscribe(self: &Arc<Self>, room_id: &str) -> Result<ListenerStream, RoomError> {
        let listener_id = self.next_token();
        let rx = self.with_room_mut(room_id, |room| room.subscribe(listener_id.clone()))?;
        Ok(ListenerStream::new(
            UnboundedReceiverStream::new(rx),
            Arc::clone(self),
            room_id.to_string(),
            listener_id,
        ))
    }

    /// Deregistration path driven by the disconnect guard. A missing room
    /// is fine here: eviction may have already dropped it.
    pub fn remove_listener(&self, room_id: &str, listener_id: &str) {
        if let Some(mut room) = self.rooms.get_mut(room_id) {
            room.remove_listener(listener_id);
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            room_count: self.rooms.len(),
        }
    }

    /// Iterate live rooms read-only. Used by the keepalive sweep.
    pub(crate) fn for_each_room(&self, mut f: impl FnMut(&Room)) {
        for room in self.rooms.iter() {
            f(&room);
        }
    }

    /// Collect ids of rooms whose `last_modified` is older than `cutoff`.
    /// Separate from deletion so the map is never structurally mutated
    /// while being iterated.
    pub(crate) fn collect_stale(&self, cutoff: chrono::DateTime<chrono::Utc>) -> Vec<String> {
        self.rooms
            .iter()
            .filter(|room| room.last_modified() < cutoff)
            .map(|room| room.id().to_string())
            .collect()
    }

    /// Close every listener of the room, then drop the registry entry.
    /// The room is fully closed before the mapping entry disappears, so
    /// lookups never observe a half-removed room.
    pub(crate) fn evict(&self, room_id: &str) {
        if let Some(mut room) = self.rooms.get_mut(room_id) {
            room.close();
        } else {
            return;
        }
        self.rooms.remove(room_id);
        tracing::info!(room_id = %room_id, "Room evicted");
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
