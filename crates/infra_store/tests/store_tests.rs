//! Integration tests for the key-value store adapters

use std::fs;

use core_kernel::KeyValueStore;
use infra_store::{open_store, FileKeyValueStore, MemoryKeyValueStore, StoreConfig, StoreError};
use proptest::prelude::*;
use tempfile::TempDir;

/// Runs the shared contract against any store
fn exercise_contract(store: &impl KeyValueStore) {
    assert_eq!(store.get("investmentProfiles").unwrap(), None);

    store.set("investmentProfiles", "[]").unwrap();
    store.set("lastUsedProfile", "Growth").unwrap();
    assert_eq!(store.get("investmentProfiles").unwrap().as_deref(), Some("[]"));

    store.set("lastUsedProfile", "Income").unwrap();
    assert_eq!(store.get("lastUsedProfile").unwrap().as_deref(), Some("Income"));

    store.remove("lastUsedProfile").unwrap();
    assert_eq!(store.get("lastUsedProfile").unwrap(), None);

    // removing a missing key is not an error
    store.remove("lastUsedProfile").unwrap();
}

mod contract_tests {
    use super::*;

    #[test]
    fn test_memory_store_contract() {
        exercise_contract(&MemoryKeyValueStore::new());
    }

    #[test]
    fn test_file_store_contract() {
        let dir = TempDir::new().unwrap();
        exercise_contract(&FileKeyValueStore::open_path(dir.path().join("store.json")).unwrap());
    }

    #[test]
    fn test_handle_contract() {
        let dir = TempDir::new().unwrap();
        exercise_contract(&open_store(&StoreConfig::new(dir.path().join("store.json"))).unwrap());
        exercise_contract(&open_store(&StoreConfig::in_memory()).unwrap());
    }

    #[test]
    fn test_shared_store_through_arc() {
        let store = std::sync::Arc::new(MemoryKeyValueStore::new());
        let shared = store.clone();
        shared.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}

mod file_tests {
    use super::*;

    #[test]
    fn test_file_is_a_json_object_of_strings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = FileKeyValueStore::open_path(&path).unwrap();
        store.set("lastUsedProfile", "Growth").unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["lastUsedProfile"], "Growth");
    }

    #[test]
    fn test_pretty_output_is_indented() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = FileKeyValueStore::open(&StoreConfig::new(&path).pretty(true)).unwrap();
        store.set("k", "v").unwrap();

        assert!(fs::read_to_string(&path).unwrap().contains("\n  \"k\""));
    }

    #[test]
    fn test_empty_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "").unwrap();

        let store = FileKeyValueStore::open_path(&path).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_missing_directory_without_create_fails_on_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent").join("store.json");
        let store = FileKeyValueStore::open(&StoreConfig::new(&path).create_dirs(false)).unwrap();

        let error = store.set("k", "v").unwrap_err();
        assert!(matches!(error, core_kernel::PortError::Io { .. }));
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_non_string_values_are_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"investmentProfiles": [1, 2]}"#).unwrap();

        assert!(matches!(
            FileKeyValueStore::open_path(&path),
            Err(StoreError::Corrupt { .. })
        ));
    }
}

proptest! {
    #[test]
    fn prop_file_store_round_trips_values(
        entries in proptest::collection::btree_map("[a-zA-Z]{1,12}", ".{0,40}", 0..8),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = FileKeyValueStore::open_path(&path).unwrap();
        for (key, value) in &entries {
            store.set(key, value).unwrap();
        }
        drop(store);

        let reopened = FileKeyValueStore::open_path(&path).unwrap();
        for (key, value) in &entries {
            let got = reopened.get(key).unwrap();
            prop_assert_eq!(got.as_deref(), Some(value.as_str()));
        }
    }
}
