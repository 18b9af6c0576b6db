//! Errors raised at the fallible boundaries of the core (loading and configuration).
//!
//! Interaction paths never return these: gestures, manipulation and selection
//! degrade to a clamp or a no-op instead.

use thiserror::Error;

/// Core errors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unsupported design version: {0}")]
    UnsupportedVersion(u32),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
