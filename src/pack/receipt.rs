//! Receipt tracking: has this player already been granted the starter pack?
//!
//! Two tiers back the answer. A process-lifetime cache of player ids answers
//! repeat questions cheaply; the durable per-player attribute survives
//! restarts and lazily repopulates the cache the first time it is read.

use std::collections::HashSet;

use log::debug;
use uuid::Uuid;

use super::errors::StarterPackError;
use super::types::{NamespacedKey, RECEIVED_KEY};
use crate::storage::{AttributeStore, AttributeValue};

pub struct ReceiptTracker<S: AttributeStore> {
    cache: HashSet<Uuid>,
    store: S,
    key: NamespacedKey,
}

impl<S: AttributeStore> ReceiptTracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            cache: HashSet::new(),
            store,
            key: NamespacedKey::plugin(RECEIVED_KEY),
        }
    }

    /// Cached ids first, then the durable attribute. A durable hit is cached.
    pub fn has_received(&mut self, player: Uuid) -> Result<bool, StarterPackError> {
        if self.cache.contains(&player) {
            return Ok(true);
        }
        if self.store.has(player, &self.key)? {
            self.cache.insert(player);
            return Ok(true);
        }
        Ok(false)
    }

    /// Idempotent. The cache is only updated once the durable write succeeded.
    pub fn mark_received(&mut self, player: Uuid) -> Result<(), StarterPackError> {
        self.store.set(player, &self.key, AttributeValue::Byte(1))?;
        self.cache.insert(player);
        Ok(())
    }

    pub fn reset(&mut self, player: Uuid) -> Result<(), StarterPackError> {
        self.cache.remove(&player);
        let removed = self.store.remove(player, &self.key)?;
        debug!("Cleared receipt for {} (durable attribute present: {})", player, removed);
        Ok(())
    }

    /// Clear the whole cache, then the durable attribute of each listed
    /// (currently connected) player. Returns how many attributes were cleared.
    /// Players not in `online` keep their durable receipt.
    pub fn reset_all(&mut self, online: &[Uuid]) -> Result<usize, StarterPackError> {
        self.cache.clear();
        let mut cleared = 0;
        for player in online {
            if self.store.has(*player, &self.key)? {
                self.store.remove(*player, &self.key)?;
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the durable store, discarding the cache.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FailingAttributeStore, MemoryAttributeStore};

    fn tracker() -> ReceiptTracker<MemoryAttributeStore> {
        ReceiptTracker::new(MemoryAttributeStore::new())
    }

    #[test]
    fn unknown_player_has_not_received() {
        let mut t = tracker();
        let player = Uuid::new_v4();
        assert!(!t.has_received(player).unwrap());
        assert_eq!(t.cached_count(), 0);
    }

    #[test]
    fn mark_then_has_received() {
        let mut t = tracker();
        let player = Uuid::new_v4();
        t.mark_received(player).unwrap();
        t.mark_received(player).unwrap();
        assert!(t.has_received(player).unwrap());
        assert_eq!(t.cached_count(), 1);
    }

    #[test]
    fn durable_attribute_survives_restart_and_repopulates_cache() {
        let mut t = tracker();
        let player = Uuid::new_v4();
        t.mark_received(player).unwrap();

        let mut restarted = ReceiptTracker::new(t.into_store());
        assert_eq!(restarted.cached_count(), 0);
        assert!(restarted.has_received(player).unwrap());
        assert_eq!(restarted.cached_count(), 1);
    }

    #[test]
    fn reset_clears_both_tiers() {
        let mut t = tracker();
        let player = Uuid::new_v4();
        t.mark_received(player).unwrap();
        t.reset(player).unwrap();
        assert!(!t.has_received(player).unwrap());
        assert!(t.store().is_empty());

        t.mark_received(player).unwrap();
        assert!(t.has_received(player).unwrap());
    }

    #[test]
    fn reset_all_only_touches_listed_players() {
        let mut t = tracker();
        let online = Uuid::new_v4();
        let offline = Uuid::new_v4();
        let never = Uuid::new_v4();
        t.mark_received(online).unwrap();
        t.mark_received(offline).unwrap();

        let cleared = t.reset_all(&[online, never]).unwrap();
        assert_eq!(cleared, 1);
        assert_eq!(t.cached_count(), 0);
        assert!(!t.has_received(online).unwrap());
        assert!(t.has_received(offline).unwrap());
    }

    #[test]
    fn failed_write_is_not_cached() {
        let mut t = ReceiptTracker::new(FailingAttributeStore::writes());
        let player = Uuid::new_v4();
        assert!(matches!(t.mark_received(player), Err(StarterPackError::Io(_))));
        assert_eq!(t.cached_count(), 0);
        assert!(!t.has_received(player).unwrap());
        assert!(t.reset(player).is_err());
    }

    #[test]
    fn failed_read_surfaces_as_error() {
        let mut t = ReceiptTracker::new(FailingAttributeStore::reads());
        let player = Uuid::new_v4();
        assert!(t.has_received(player).is_err());
        assert!(t.reset_all(&[player]).is_err());
    }
}
