//! Storage error types
//!
//! This module defines the errors raised by the key-value store adapters and
//! their mapping onto the port-level [`PortError`].

use std::path::PathBuf;
use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur while reading or writing a store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not a JSON object of string values
    #[error("Store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Another thread panicked while holding the store lock
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Creates an I/O error for a path
    ///
    /// # Arguments
    ///
    /// * `path` - The file being accessed
    /// * `source` - The underlying I/O failure
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// Checks if this error came from the file system
    pub fn is_io(&self) -> bool {
        matches!(self, StoreError::Io { .. })
    }
}

impl From<StoreError> for PortError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Io { ref path, .. } => {
                let message = format!("accessing {}", path.display());
                PortError::io(message, error)
            }
            StoreError::Corrupt { ref path, ref source } => {
                PortError::serialization(path.display().to_string(), source)
            }
            StoreError::LockPoisoned => PortError::internal(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_maps_to_port_io() {
        let error = StoreError::io(
            "/tmp/profiles.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(error.is_io());

        let port: PortError = error.into();
        assert!(matches!(port, PortError::Io { .. }));
        assert!(port.to_string().contains("profiles.json"));
    }

    #[test]
    fn test_poisoned_lock_maps_to_internal() {
        let port: PortError = StoreError::LockPoisoned.into();
        assert!(matches!(port, PortError::Internal { .. }));
    }
}
