use std::path::PathBuf;

use thiserror::Error;

use crate::index::IndexError;

/// Failure to extract text from a single document.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The PDF could not be parsed.
    #[error("PDF extraction failed for {path}: {reason}")]
    Pdf {
        /// Document path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The file extension is not a supported document type.
    #[error("unsupported document type: {path}")]
    Unsupported {
        /// Document path.
        path: PathBuf,
    },
}

/// Errors that abort corpus loading as a whole.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus directory does not exist.
    #[error("corpus directory not found: {path}")]
    RootNotFound {
        /// Configured root.
        path: PathBuf,
    },

    /// The corpus root is not a directory.
    #[error("corpus root is not a directory: {path}")]
    NotADirectory {
        /// Configured root.
        path: PathBuf,
    },

    /// Listing the corpus directory failed.
    #[error("failed to scan corpus directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Building the index failed.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Convenience result type for corpus operations.
pub type CorpusResult<T> = Result<T, CorpusError>;
