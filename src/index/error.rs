use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
/// Errors returned by the corpus index.
pub enum IndexError {
    /// The index holds no passages (empty corpus or never built).
    #[error("corpus index is not ready: no passages have been indexed")]
    NotReady,

    /// `k` must be at least one.
    #[error("top-k must be at least 1")]
    InvalidTopK,

    /// The embedder failed for a passage or query.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The embedder returned a vector of unexpected length.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension reported by the embedder.
        expected: usize,
        /// Dimension actually received.
        actual: usize,
    },

    /// The embedder returned a different number of vectors than passages.
    #[error("embedder returned {vectors} vectors for {passages} passages")]
    VectorCountMismatch {
        /// Passages submitted.
        passages: usize,
        /// Vectors received.
        vectors: usize,
    },

    /// A background search task panicked or was cancelled.
    #[error("search task failed: {reason}")]
    TaskFailed {
        /// Error message.
        reason: String,
    },
}

/// Convenience result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

impl IndexError {
    /// Returns `true` for failures a retry may clear (model or task errors).
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(self, IndexError::Embedding(_) | IndexError::TaskFailed { .. })
    }
}
