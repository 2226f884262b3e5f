//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when using session storage.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Filesystem operation failed.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The write would grow the storage area past its quota.
    #[error("Storage quota exceeded: {needed} bytes needed, quota is {quota} bytes")]
    QuotaExceeded { needed: usize, quota: usize },

    /// A storage area file exists but could not be parsed.
    #[error("Corrupt storage area {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Session ID cannot be used to name a storage area.
    #[error("Invalid session id: {0:?}")]
    InvalidSessionId(String),
}
