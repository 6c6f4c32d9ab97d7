//! Store Test Utilities
//!
//! Provides temporary key-value stores for integration tests and a
//! once-only tracing subscriber that writes through the test harness.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

use infra_store::{FileKeyValueStore, MemoryKeyValueStore, StoreError};

static TEST_TRACING: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
});

/// Installs a tracing subscriber for tests, once per process
///
/// Set `RUST_LOG=debug` to see store and session logs in test output.
pub fn init_test_tracing() {
    Lazy::force(&TEST_TRACING);
}

/// A file-backed store in its own temporary directory
///
/// The directory is removed when this value is dropped.
pub struct TestFileStore {
    dir: TempDir,
    path: PathBuf,
}

impl TestFileStore {
    /// Creates an empty temporary directory for a store file
    pub fn new() -> std::io::Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join("allocator-store.json");
        Ok(Self { dir, path })
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The temporary directory holding the store file
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Opens (or re-opens) the store file
    pub fn open(&self) -> Result<FileKeyValueStore, StoreError> {
        FileKeyValueStore::open_path(&self.path)
    }
}

/// An empty in-memory store
pub fn memory_store() -> MemoryKeyValueStore {
    MemoryKeyValueStore::new()
}
