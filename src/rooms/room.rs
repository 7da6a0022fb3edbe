//! A password-protected broadcast channel with its own config and
//! subscriber set.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::rooms::listener::EventListener;

pub struct Room {
    id: String,
    password: String,
    config: serde_json::Value,
    listeners: HashMap<String, EventListener>,
    last_modified: DateTime<Utc>,
}

impl Room {
    pub fn new(id: String, password: String) -> Self {
        Self {
            id,
            password,
            config: serde_json::Value::Object(serde_json::Map::new()),
            listeners: HashMap::new(),
            last_modified: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Exact string equality against the stored secret.
    pub fn check_password(&self, candidate: &str) -> bool {
        candidate == self.password
    }

    /// Replace the stored config wholesale (no merge, no shape validation)
    /// and bump `last_modified`. This is the only operation that refreshes
    /// the eviction clock.
    pub fn set_config(&mut self, doc: serde_json::Value) {
        self.config = doc;
        self.last_modified = Utc::now();
    }

    pub fn config(&self) -> &serde_json::Value {
        &self.config
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Register a new listener under `listener_id` and return the receiver
    /// feeding its response body. The `:connected` priming frame is already
    /// queued when this returns. If the id somehow collides with a live
    /// entry, the stale listener is closed and replaced first.
    pub fn subscribe(&mut self, listener_id: String) -> mpsc::UnboundedReceiver<Bytes> {
        if let Some(mut stale) = self.listeners.remove(&listener_id) {
            stale.close();
        }
        let (listener, rx) = EventListener::open(listener_id.clone());
        self.listeners.insert(listener_id, listener);
        rx
    }

    /// Drop a listener from the collection. Invoked by the disconnect
    /// guard when the remote peer cancels its stream.
    pub fn remove_listener(&mut self, listener_id: &str) {
        self.listeners.remove(listener_id);
    }

    /// Deliver one event to every currently-registered listener. A failing
    /// transport never aborts delivery to the rest and never surfaces to
    /// the broadcaster; a broadcast reaching zero listeners is a success.
    pub fn broadcast(&self, event: Option<&str>, data: &str) {
        for listener in self.listeners.values() {
            if listener.push(event, data).is_err() {
                tracing::debug!(
                    room_id = %self.id,
                    listener_id = %listener.id(),
                    "Dropped broadcast to closed listener"
                );
            }
        }
    }

    /// Send the keepalive comment frame to every listener, with the same
    /// failure isolation as `broadcast`.
    pub fn ping_all(&self) {
        for listener in self.listeners.values() {
            let _ = listener.ping_keepalive();
        }
    }

    /// Force-close every listener. Used when the room itself is being
    /// evicted from the registry.
    pub fn close(&mut self) {
        for listener in self.listeners.values_mut() {
            listener.close();
        }
    }

    /// Shift `last_modified` into the past so eviction tests do not have
    /// to wait out the real TTL.
    #[cfg(test)]
    pub(crate) fn backdate_last_modified(&mut self, by: chrono::Duration) {
        self.last_modified -= by;
    }
}
