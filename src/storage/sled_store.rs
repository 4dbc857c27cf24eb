use std::path::{Path, PathBuf};

use sled::IVec;
use uuid::Uuid;

use super::{AttributeStore, AttributeValue};
use crate::pack::errors::StarterPackError;
use crate::pack::types::NamespacedKey;

const TREE_ATTRIBUTES: &str = "starterpack_attributes";

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct SledAttributeStoreBuilder {
    path: PathBuf,
}

impl SledAttributeStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<SledAttributeStore, StarterPackError> {
        SledAttributeStore::open(self.path)
    }
}

/// Sled-backed persistence for per-player attributes.
pub struct SledAttributeStore {
    _db: sled::Db,
    attributes: sled::Tree,
}

impl SledAttributeStore {
    /// Open (or create) the attribute store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StarterPackError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let attributes = db.open_tree(TREE_ATTRIBUTES)?;
        Ok(Self {
            _db: db,
            attributes,
        })
    }

    fn attribute_key(player: Uuid, key: &NamespacedKey) -> Vec<u8> {
        format!("players:{}:{}", player, key).into_bytes()
    }

    fn serialize(value: &AttributeValue) -> Result<Vec<u8>, StarterPackError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize(bytes: IVec) -> Result<AttributeValue, StarterPackError> {
        Ok(bincode::deserialize::<AttributeValue>(&bytes)?)
    }

    /// Players (online or not) that currently carry `key`.
    pub fn list_players_with(&self, key: &NamespacedKey) -> Result<Vec<Uuid>, StarterPackError> {
        let suffix = format!(":{}", key);
        let mut ids = Vec::new();
        for entry in self.attributes.scan_prefix(b"players:") {
            let (raw, _) = entry?;
            let text = String::from_utf8_lossy(&raw);
            let Some(rest) = text.strip_prefix("players:") else {
                continue;
            };
            let Some(id) = rest.strip_suffix(suffix.as_str()) else {
                continue;
            };
            if let Ok(id) = Uuid::parse_str(id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

impl AttributeStore for SledAttributeStore {
    fn has(&self, player: Uuid, key: &NamespacedKey) -> Result<bool, StarterPackError> {
        Ok(self
            .attributes
            .contains_key(Self::attribute_key(player, key))?)
    }

    fn get(
        &self,
        player: Uuid,
        key: &NamespacedKey,
    ) -> Result<Option<AttributeValue>, StarterPackError> {
        let Some(bytes) = self.attributes.get(Self::attribute_key(player, key))? else {
            return Ok(None);
        };
        Ok(Some(Self::deserialize(bytes)?))
    }

    fn set(
        &mut self,
        player: Uuid,
        key: &NamespacedKey,
        value: AttributeValue,
    ) -> Result<(), StarterPackError> {
        let bytes = Self::serialize(&value)?;
        self.attributes
            .insert(Self::attribute_key(player, key), bytes)?;
        self.attributes.flush()?;
        Ok(())
    }

    fn remove(&mut self, player: Uuid, key: &NamespacedKey) -> Result<bool, StarterPackError> {
        let removed = self.attributes.remove(Self::attribute_key(player, key))?;
        self.attributes.flush()?;
        Ok(removed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn attribute_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = SledAttributeStoreBuilder::new(dir.path()).open().expect("store");
        let key = NamespacedKey::plugin("equipment_slot");
        let player = Uuid::new_v4();

        store
            .set(player, &key, AttributeValue::Text("helmet".into()))
            .expect("set");
        assert_eq!(
            store.get(player, &key).expect("get"),
            Some(AttributeValue::Text("helmet".into()))
        );
        assert!(store.remove(player, &key).expect("remove"));
        assert_eq!(store.get(player, &key).expect("get"), None);
    }

    #[test]
    fn attributes_survive_reopen() {
        let dir = TempDir::new().expect("tempdir");
        let key = NamespacedKey::plugin("received_starter_pack");
        let player = Uuid::new_v4();
        {
            let mut store = SledAttributeStoreBuilder::new(dir.path()).open().expect("store");
            store.set(player, &key, AttributeValue::Byte(1)).expect("set");
        }

        let store = SledAttributeStoreBuilder::new(dir.path())
            .open()
            .expect("reopen store");
        assert!(store.has(player, &key).expect("has"));
        assert_eq!(store.list_players_with(&key).expect("list"), vec![player]);
    }

    #[test]
    fn list_players_filters_by_key() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = SledAttributeStoreBuilder::new(dir.path()).open().expect("store");
        let received = NamespacedKey::plugin("received_starter_pack");
        let other = NamespacedKey::plugin("something_else");
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.set(a, &received, AttributeValue::Byte(1)).expect("set");
        store.set(b, &other, AttributeValue::Byte(1)).expect("set");

        assert_eq!(store.list_players_with(&received).expect("list"), vec![a]);
    }
}
