//! Background maintenance tasks over the registry.
//!
//! Two independent timer loops: a keepalive sweep so intermediary proxies
//! do not time out idle streams, and an eviction sweep that removes rooms
//! whose config has not changed within the TTL. Both are also plain
//! callable procedures so tests can run them synchronously instead of
//! waiting on real timers.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::config::RoomsConfig;
use crate::rooms::registry::RoomRegistry;

/// Send a keepalive comment frame to every listener of every live room.
/// Per-room and per-listener failures are isolated and never stop the
/// sweep over remaining rooms.
pub fn keepalive_sweep(registry: &RoomRegistry) {
    registry.for_each_room(|room| room.ping_all());
}

/// Close and remove every room whose `last_modified` is older than `ttl`.
/// Broadcasts and listener churn do not refresh `last_modified`; only
/// config changes do, so an actively-streaming room with a stale config
/// is still evicted.
pub fn eviction_sweep(registry: &RoomRegistry, ttl: chrono::Duration) {
    let cutoff = Utc::now() - ttl;
    let stale = registry.collect_stale(cutoff);
    let evicted = stale.len();
    for room_id in stale {
        registry.evict(&room_id);
    }
    if evicted > 0 {
        tracing::info!("Eviction sweep removed {} stale rooms", evicted);
    } else {
        tracing::debug!("Eviction sweep: no stale rooms");
    }
}

/// Spawn the two periodic maintenance loops. Intervals are measured from
/// process start, not tied to any individual room event.
pub fn spawn_maintenance_tasks(registry: Arc<RoomRegistry>, cfg: &RoomsConfig) {
    let keepalive_interval = Duration::from_secs(cfg.keepalive_interval_secs);
    let eviction_interval = Duration::from_secs(cfg.eviction_interval_secs);
    let ttl = chrono::Duration::seconds(cfg.ttl_secs as i64);

    let keepalive_registry = Arc::clone(&registry);
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(keepalive_interval).await;
            keepalive_sweep(&keepalive_registry);
        }
    });

    tokio::spawn(async move {
        loop {
            tokio::time::sleep(eviction_interval).await;
            eviction_sweep(&registry, ttl);
        }
    });
}
