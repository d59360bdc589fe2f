use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::cache::{CacheStore, RAGATE_STATUS_HEADER};
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::generation::Generator;

/// Plain-text body of `GET /` when no page is configured.
pub const INFO_TEXT: &str = "API RAG OpenAI Online.";

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub input_text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskResponse {
    pub resposta: String,
    pub origem: String,
}

#[instrument(skip(state, payload))]
pub async fn ask_handler<S, G>(
    State(state): State<HandlerState<S, G>>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError>
where
    S: CacheStore + Clone + 'static,
    G: Generator + 'static,
{
    let Json(payload) = payload.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let request: AskRequest = serde_json::from_value(payload)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))?;

    let answer = state.service.ask(&request.input_text).await?;
    debug!(provenance = %answer.provenance, "Answer ready");

    let mut headers = HeaderMap::new();
    headers.insert(
        RAGATE_STATUS_HEADER,
        HeaderValue::from_static(answer.provenance.as_header_value()),
    );

    let body = AskResponse {
        resposta: answer.text,
        origem: answer.provenance.as_origin().to_string(),
    };

    Ok((StatusCode::OK, headers, Json(body)).into_response())
}

#[instrument(skip(state))]
pub async fn home_handler<S, G>(State(state): State<HandlerState<S, G>>) -> Response
where
    S: CacheStore + Clone + 'static,
    G: Generator + 'static,
{
    match tokio::fs::read_to_string(&state.index_html).await {
        Ok(page) => Html(page).into_response(),
        Err(_) => INFO_TEXT.into_response(),
    }
}
