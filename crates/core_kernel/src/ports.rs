//! Ports and Adapters Infrastructure
//!
//! The allocation engine never touches storage directly. Persistence goes
//! through the [`KeyValueStore`] port, a string-keyed store with string
//! values, so the same profile logic runs against a JSON file on disk or an
//! in-memory map in tests.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   Session / ProfileStore     │
//! └──────────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────┐
//! │     KeyValueStore (port)     │
//! └──────────────────────────────┘
//!         ▲              ▲
//!  ┌──────┴─────┐  ┌─────┴──────┐
//!  │ File store │  │ Memory     │
//!  │ (infra)    │  │ store      │
//!  └────────────┘  └────────────┘
//! ```

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error type for port operations
///
/// All store adapters report failures through this type so callers can
/// handle a file-backed and an in-memory store the same way.
#[derive(Debug, Error)]
pub enum PortError {
    /// A stored value could not be encoded or decoded
    #[error("Serialization error for key {key}: {message}")]
    Serialization {
        key: String,
        message: String,
    },

    /// The backing medium could not be read or written
    #[error("Storage I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl PortError {
    /// Creates a Serialization error for a stored key
    pub fn serialization(key: impl Into<String>, message: impl fmt::Display) -> Self {
        PortError::Serialization {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Creates an Io error wrapping the underlying cause
    pub fn io(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PortError::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
        }
    }
}

/// Marker trait for all domain ports
pub trait DomainPort: Send + Sync + 'static {}

/// Durable string-keyed storage
///
/// Operations are synchronous. The store is local and assumed available, so
/// adapters do not retry; any failure is returned to the caller.
pub trait KeyValueStore: DomainPort {
    /// Reads the value under `key`, or `None` if the key is absent
    fn get(&self, key: &str) -> Result<Option<String>, PortError>;

    /// Writes `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), PortError>;

    /// Deletes `key`; deleting an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), PortError>;
}

impl<T: KeyValueStore + ?Sized> DomainPort for Arc<T> {}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, PortError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PortError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PortError> {
        (**self).remove(key)
    }
}
