//! In-memory key-value store
//!
//! Holds entries in a map for the lifetime of the process. Used in tests and
//! when a session is configured without durable storage.

use std::collections::BTreeMap;
use std::sync::RwLock;

use core_kernel::{DomainPort, KeyValueStore, PortError};

use crate::error::StoreError;

/// A non-durable [`KeyValueStore`]
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with entries
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// A copy of every entry, ordered by key
    pub fn snapshot(&self) -> Result<BTreeMap<String, String>, PortError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.clone())
    }
}

impl DomainPort for MemoryKeyValueStore {}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PortError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PortError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PortError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("lastUsedProfile").unwrap(), None);

        store.set("lastUsedProfile", "Growth").unwrap();
        assert_eq!(store.get("lastUsedProfile").unwrap().as_deref(), Some("Growth"));

        store.remove("lastUsedProfile").unwrap();
        store.remove("lastUsedProfile").unwrap();
        assert_eq!(store.get("lastUsedProfile").unwrap(), None);
    }

    #[test]
    fn test_with_entries() {
        let store = MemoryKeyValueStore::with_entries([("a", "1"), ("b", "2")]);
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["b"], "2");
    }
}
