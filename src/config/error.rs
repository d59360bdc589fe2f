//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Cache version must be a non-empty token without separators or whitespace.
    #[error("invalid cache version '{value}'")]
    InvalidCacheVersion { value: String },

    /// Redis URL with an unsupported scheme.
    #[error("invalid redis url '{value}': expected redis://, rediss:// or unix://")]
    InvalidRedisUrl { value: String },

    /// The in-memory cache needs room for at least one entry.
    #[error("cache capacity must be at least 1")]
    InvalidCapacity,

    /// Timeouts must be positive.
    #[error("{name} must be greater than zero")]
    InvalidTimeout { name: &'static str },
}
