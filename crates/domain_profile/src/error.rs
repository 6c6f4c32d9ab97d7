//! Profile domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur while managing profiles
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile name must not be blank")]
    BlankName,

    #[error("Stored profile data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Profile storage failed: {0}")]
    Port(#[from] PortError),
}
