use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::answer::AnswerError;
use crate::cache::RAGATE_STATUS_HEADER;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("system not initialized: no documents have been indexed")]
    NotReady,

    #[error("retrieval failed: {0}")]
    RetrievalFailed(String),

    /// Carries the generation failure as reported by the answer service.
    #[error("{0}")]
    ProviderError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<AnswerError> for GatewayError {
    fn from(err: AnswerError) -> Self {
        match err {
            AnswerError::BadRequest { reason } => GatewayError::InvalidRequest(reason),
            AnswerError::NotReady => GatewayError::NotReady,
            AnswerError::Retrieval { reason } => GatewayError::RetrievalFailed(reason),
            AnswerError::Generation { message } => GatewayError::ProviderError(message),
        }
    }
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::RetrievalFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::ProviderError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn ragate_status(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::NotReady => "not_ready",
            GatewayError::RetrievalFailed(_) => "retrieval_error",
            GatewayError::ProviderError(_) => "provider_error",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut headers = HeaderMap::new();
        headers.insert(
            RAGATE_STATUS_HEADER,
            HeaderValue::from_static(self.ragate_status()),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
