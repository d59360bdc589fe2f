use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by cache stores and the cache gate.
pub enum CacheError {
    /// The store cannot be reached.
    #[error("cache store unavailable: {reason}")]
    Unavailable {
        /// Error message.
        reason: String,
    },

    /// Filesystem error in the file store.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Entry (de)serialization failed.
    #[error("cache entry serialization failed: {0}")]
    Serialization(String),

    /// A cached value is not a valid answer.
    #[error("invalid cached payload: {reason}")]
    InvalidPayload {
        /// Error message.
        reason: String,
    },

    /// The key cannot be mapped to a storage location.
    #[error("invalid cache key: {key}")]
    InvalidKey {
        /// Offending key.
        key: String,
    },

    /// A blocking store task panicked or was cancelled.
    #[error("cache task failed: {reason}")]
    TaskFailed {
        /// Error message.
        reason: String,
    },
}

/// Convenience result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
