use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Terminal failures of a question.
pub enum AnswerError {
    /// The query is empty or whitespace only.
    #[error("bad request: {reason}")]
    BadRequest {
        /// What was wrong with the request.
        reason: String,
    },

    /// No corpus has been indexed.
    #[error("system not initialized: no documents have been indexed")]
    NotReady,

    /// Embedding the query or searching the index failed.
    #[error("retrieval failed: {reason}")]
    Retrieval {
        /// Error message.
        reason: String,
    },

    /// The generation backend failed or timed out.
    #[error("generation failed: {message}")]
    Generation {
        /// Backend message.
        message: String,
    },
}

impl AnswerError {
    /// Error code used in HTTP error bodies and status headers.
    pub fn code(&self) -> &'static str {
        match self {
            AnswerError::BadRequest { .. } => "bad_request",
            AnswerError::NotReady => "not_ready",
            AnswerError::Retrieval { .. } => "retrieval_error",
            AnswerError::Generation { .. } => "generation_error",
        }
    }
}
