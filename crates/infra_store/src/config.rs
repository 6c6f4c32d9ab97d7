//! Store configuration
//!
//! [`StoreConfig`] describes where a store lives and how it writes;
//! [`open_store`] turns it into a ready [`StoreHandle`].

use std::path::PathBuf;

use core_kernel::{DomainPort, KeyValueStore, PortError};

use crate::error::StoreError;
use crate::file::FileKeyValueStore;
use crate::memory::MemoryKeyValueStore;

/// Configuration options for a key-value store
///
/// # Example
///
/// ```rust
/// use infra_store::StoreConfig;
///
/// let config = StoreConfig::new("data/allocator.json")
///     .pretty(true)
///     .create_dirs(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the JSON store file
    pub path: PathBuf,
    /// Write indented JSON
    pub pretty: bool,
    /// Create missing parent directories on open
    pub create_dirs: bool,
    /// Keep everything in memory and ignore `path`
    pub in_memory: bool,
}

impl StoreConfig {
    /// Creates a file-backed configuration for `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the JSON store file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
            create_dirs: true,
            in_memory: false,
        }
    }

    /// Creates a configuration for a throwaway in-memory store
    pub fn in_memory() -> Self {
        Self {
            in_memory: true,
            ..Self::default()
        }
    }

    /// Sets whether the file is written as indented JSON
    ///
    /// # Arguments
    ///
    /// * `pretty` - Indent output (default: false)
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets whether missing parent directories are created on open
    ///
    /// # Arguments
    ///
    /// * `create` - Create directories (default: true)
    pub fn create_dirs(mut self, create: bool) -> Self {
        self.create_dirs = create;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("allocator-store.json")
    }
}

/// A store opened from a [`StoreConfig`]
#[derive(Debug)]
pub enum StoreHandle {
    Memory(MemoryKeyValueStore),
    File(FileKeyValueStore),
}

impl StoreHandle {
    pub fn is_durable(&self) -> bool {
        matches!(self, StoreHandle::File(_))
    }
}

impl DomainPort for StoreHandle {}

impl KeyValueStore for StoreHandle {
    fn get(&self, key: &str) -> Result<Option<String>, PortError> {
        match self {
            StoreHandle::Memory(store) => store.get(key),
            StoreHandle::File(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PortError> {
        match self {
            StoreHandle::Memory(store) => store.set(key, value),
            StoreHandle::File(store) => store.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), PortError> {
        match self {
            StoreHandle::Memory(store) => store.remove(key),
            StoreHandle::File(store) => store.remove(key),
        }
    }
}

/// Opens the store described by `config`
///
/// # Errors
///
/// Returns a `StoreError` if a file-backed store cannot be opened
pub fn open_store(config: &StoreConfig) -> Result<StoreHandle, StoreError> {
    if config.in_memory {
        return Ok(StoreHandle::Memory(MemoryKeyValueStore::new()));
    }
    FileKeyValueStore::open(config).map(StoreHandle::File)
}
