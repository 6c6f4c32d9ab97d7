//! Core error types used across the system

use thiserror::Error;

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}

impl CoreError {
    pub fn overflow(message: impl Into<String>) -> Self {
        CoreError::Overflow(message.into())
    }
}
