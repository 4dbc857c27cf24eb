//! # Storage Module - Durable Per-Player Attributes
//!
//! The host platform lets add-ons attach small key/value attributes to a
//! player's saved profile. This module models that capability as the
//! [`AttributeStore`] trait so the receipt tracker can run against either a
//! real persistent backend or an in-memory fake.
//!
//! ## Backends
//!
//! - [`MemoryAttributeStore`] - HashMap-backed, lives as long as the value does
//! - [`SledAttributeStore`] - sled tree on disk, survives process restarts
//!
//! ## Key Layout
//!
//! Attributes are addressed by `(player uuid, namespace:key)`. The sled
//! backend stores them under `players:<uuid>:<namespace>:<key>`:
//!
//! ```text
//! players:5f0c…:starterpack:received_starter_pack → Byte(1)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use starterpack::pack::types::NamespacedKey;
//! use starterpack::storage::{AttributeStore, AttributeValue, SledAttributeStoreBuilder};
//! use uuid::Uuid;
//!
//! fn main() -> Result<(), starterpack::pack::StarterPackError> {
//!     let mut store = SledAttributeStoreBuilder::new("./data/attributes").open()?;
//!     let key = NamespacedKey::plugin("received_starter_pack");
//!     let player = Uuid::new_v4();
//!     store.set(player, &key, AttributeValue::Byte(1))?;
//!     assert!(store.has(player, &key)?);
//!     Ok(())
//! }
//! ```

pub mod sled_store;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pack::errors::StarterPackError;
use crate::pack::types::NamespacedKey;

pub use sled_store::{SledAttributeStore, SledAttributeStoreBuilder};

/// Typed attribute value, mirroring the host's primitive data types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    Byte(u8),
    Text(String),
}

/// Durable key/value association keyed by player identity.
pub trait AttributeStore {
    fn has(&self, player: Uuid, key: &NamespacedKey) -> Result<bool, StarterPackError>;
    fn get(
        &self,
        player: Uuid,
        key: &NamespacedKey,
    ) -> Result<Option<AttributeValue>, StarterPackError>;
    fn set(
        &mut self,
        player: Uuid,
        key: &NamespacedKey,
        value: AttributeValue,
    ) -> Result<(), StarterPackError>;
    /// Remove an attribute. Returns whether it was present.
    fn remove(&mut self, player: Uuid, key: &NamespacedKey) -> Result<bool, StarterPackError>;
}

/// In-memory attribute store used by tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryAttributeStore {
    values: HashMap<(Uuid, NamespacedKey), AttributeValue>,
}

impl MemoryAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl AttributeStore for MemoryAttributeStore {
    fn has(&self, player: Uuid, key: &NamespacedKey) -> Result<bool, StarterPackError> {
        Ok(self.values.contains_key(&(player, key.clone())))
    }

    fn get(
        &self,
        player: Uuid,
        key: &NamespacedKey,
    ) -> Result<Option<AttributeValue>, StarterPackError> {
        Ok(self.values.get(&(player, key.clone())).cloned())
    }

    fn set(
        &mut self,
        player: Uuid,
        key: &NamespacedKey,
        value: AttributeValue,
    ) -> Result<(), StarterPackError> {
        self.values.insert((player, key.clone()), value);
        Ok(())
    }

    fn remove(&mut self, player: Uuid, key: &NamespacedKey) -> Result<bool, StarterPackError> {
        Ok(self.values.remove(&(player, key.clone())).is_some())
    }
}

/// Store whose reads and/or writes fail the way a broken disk would.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingAttributeStore {
    pub fail_reads: bool,
    pub fail_writes: bool,
    inner: MemoryAttributeStore,
}

#[cfg(test)]
impl FailingAttributeStore {
    pub fn writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn broken() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            ..Self::default()
        }
    }

    fn check(failing: bool) -> Result<(), StarterPackError> {
        if failing {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk unavailable").into())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
impl AttributeStore for FailingAttributeStore {
    fn has(&self, player: Uuid, key: &NamespacedKey) -> Result<bool, StarterPackError> {
        Self::check(self.fail_reads)?;
        self.inner.has(player, key)
    }

    fn get(
        &self,
        player: Uuid,
        key: &NamespacedKey,
    ) -> Result<Option<AttributeValue>, StarterPackError> {
        Self::check(self.fail_reads)?;
        self.inner.get(player, key)
    }

    fn set(
        &mut self,
        player: Uuid,
        key: &NamespacedKey,
        value: AttributeValue,
    ) -> Result<(), StarterPackError> {
        Self::check(self.fail_writes)?;
        self.inner.set(player, key, value)
    }

    fn remove(&mut self, player: Uuid, key: &NamespacedKey) -> Result<bool, StarterPackError> {
        Self::check(self.fail_writes)?;
        self.inner.remove(player, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let mut store = MemoryAttributeStore::new();
        let key = NamespacedKey::plugin("received_starter_pack");
        let player = Uuid::new_v4();

        assert!(!store.has(player, &key).unwrap());
        store.set(player, &key, AttributeValue::Byte(1)).unwrap();
        assert_eq!(store.get(player, &key).unwrap(), Some(AttributeValue::Byte(1)));
        assert!(store.remove(player, &key).unwrap());
        assert!(!store.remove(player, &key).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn memory_store_keys_are_per_player() {
        let mut store = MemoryAttributeStore::new();
        let key = NamespacedKey::plugin("received_starter_pack");
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.set(a, &key, AttributeValue::Byte(1)).unwrap();
        assert!(store.has(a, &key).unwrap());
        assert!(!store.has(b, &key).unwrap());
    }
}
