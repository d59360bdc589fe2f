use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors returned by generation backends.
pub enum GenerationError {
    /// The backend rejected or failed the request.
    #[error("provider error: {message}")]
    Provider {
        /// Backend message, passed through to the caller.
        message: String,
    },

    /// The backend answered without any text.
    #[error("provider returned an empty response")]
    EmptyResponse,
}

impl GenerationError {
    /// Returns `true` if another attempt may succeed.
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerationError::Provider { .. })
    }
}
