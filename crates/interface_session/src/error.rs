//! Session error handling

use thiserror::Error;

use domain_allocation::AllocationError;
use domain_profile::ProfileError;
use infra_store::StoreError;

/// Session error types
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SessionError {
    /// Checks if this error was caused by an edit naming an unknown category
    /// or sub-category
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SessionError::Allocation(
                AllocationError::CategoryNotFound(_) | AllocationError::SubCategoryNotFound { .. }
            )
        )
    }
}
