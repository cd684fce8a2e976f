use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Time-windowed suppression of repeat notifications for one entity.
///
/// A drop that lands can be observed by more than one hook path; the first
/// sighting records the entity id with an expiry, and later sightings inside
/// the window are suppressed. Expired entries are purged lazily on every
/// lookup, which stays cheap because the map only ever holds entities seen in
/// the last window.
#[derive(Debug, Clone, Default)]
pub struct DedupCache {
    expirations: Arc<Mutex<HashMap<u64, i64>>>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_suppress(&self, entity_id: u64, now_epoch: i64) -> bool {
        let mut guard = match self.expirations.lock() {
            Ok(guard) => guard,
            Err(_) => return true,
        };

        prune_expired(&mut guard, now_epoch);
        guard.contains_key(&entity_id)
    }

    pub fn mark_seen(&self, entity_id: u64, window_seconds: i64, now_epoch: i64) {
        if let Ok(mut guard) = self.expirations.lock() {
            guard.insert(entity_id, now_epoch + window_seconds);
        }
    }
}

fn prune_expired(cache: &mut HashMap<u64, i64>, now_epoch: i64) {
    cache.retain(|_, expires_at| *expires_at > now_epoch);
}
