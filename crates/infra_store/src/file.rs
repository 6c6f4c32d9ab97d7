//! JSON-file key-value store
//!
//! The whole store is one JSON object mapping keys to string values. It is
//! read once when opened and rewritten on every change: the new contents go
//! to a sibling temporary file which then replaces the original, so a crash
//! mid-write leaves the previous contents intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info, instrument};

use core_kernel::{DomainPort, KeyValueStore, PortError};

use crate::config::StoreConfig;
use crate::error::StoreError;

/// A durable [`KeyValueStore`] backed by a single JSON file
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    pretty: bool,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    /// Opens the store described by `config`
    ///
    /// A missing file is an empty store; it is created on the first write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file or its directory cannot be
    /// accessed, or `StoreError::Corrupt` if the file is not a JSON object
    /// of string values
    #[instrument(skip(config), fields(path = %config.path.display()))]
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        if config.create_dirs {
            if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let entries = read_entries(&config.path)?;
        info!(keys = entries.len(), "Opened key-value store");

        Ok(Self {
            path: config.path.clone(),
            pretty: config.pretty,
            entries: RwLock::new(entries),
        })
    }

    /// Opens a store at `path` with default settings
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open(&StoreConfig::new(path))
    }

    /// The file backing this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(entries)
        } else {
            serde_json::to_string(entries)
        }
        .map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let temp = self.path.with_extension("tmp");
        fs::write(&temp, json).map_err(|e| StoreError::io(&temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        debug!(keys = entries.len(), "Persisted key-value store");
        Ok(())
    }

    /// Applies `change` to a copy of the entries, persists it, then swaps it in
    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut next = entries.clone();
        change(&mut next);

        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(StoreError::io(path, e)),
    };

    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

impl DomainPort for FileKeyValueStore {}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PortError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    #[instrument(skip(self, value), fields(len = value.len()))]
    fn set(&self, key: &str, value: &str) -> Result<(), PortError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<(), PortError> {
        self.update(|entries| {
            entries.remove(key);
        })?;
        Ok(())
    }
}
