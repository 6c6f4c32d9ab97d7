//! Storage Infrastructure
//!
//! Adapters for the [`core_kernel::KeyValueStore`] port:
//!
//! - [`MemoryKeyValueStore`] for tests and throwaway sessions
//! - [`FileKeyValueStore`] for durable storage in a single JSON file
//!
//! # Example
//!
//! ```rust
//! use core_kernel::KeyValueStore;
//! use infra_store::{open_store, StoreConfig};
//!
//! let store = open_store(&StoreConfig::in_memory()).unwrap();
//! store.set("lastUsedProfile", "Balanced").unwrap();
//! assert_eq!(store.get("lastUsedProfile").unwrap().as_deref(), Some("Balanced"));
//! ```

pub mod config;
pub mod error;
pub mod file;
pub mod memory;

pub use config::{open_store, StoreConfig, StoreHandle};
pub use error::StoreError;
pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
