//! HTTP gateway (Axum): `POST /ask`, the home page, and health probes.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{AskRequest, AskResponse, ask_handler, home_handler};
pub use state::HandlerState;

use crate::cache::{
    CacheStore, RAGATE_STATUS_ERROR, RAGATE_STATUS_HEADER, RAGATE_STATUS_HEALTHY,
    RAGATE_STATUS_NOT_READY, RAGATE_STATUS_READY,
};
use crate::generation::Generator;

pub fn create_router_with_state<S, G>(state: HandlerState<S, G>) -> Router
where
    S: CacheStore + Clone + 'static,
    G: Generator + 'static,
{
    Router::new()
        .route("/", get(home_handler::<S, G>))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<S, G>))
        .route("/ask", post(ask_handler::<S, G>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub index: &'static str,
    pub passages: usize,
    pub cache: &'static str,
    pub cache_store: &'static str,
    pub embedder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        RAGATE_STATUS_HEADER,
        HeaderValue::from_static(RAGATE_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<S, G>(State(state): State<HandlerState<S, G>>) -> Response
where
    S: CacheStore + Clone + 'static,
    G: Generator + 'static,
{
    let index = state.service.index();
    let store = state.service.gate().store();

    let index_status = if index.is_ready() {
        RAGATE_STATUS_READY
    } else {
        RAGATE_STATUS_NOT_READY
    };

    let cache_status = if store.is_ready().await {
        RAGATE_STATUS_READY
    } else {
        RAGATE_STATUS_ERROR
    };

    let embedder_mode = if index.embedder().is_stub() {
        "stub"
    } else {
        "real"
    };

    let components = ComponentStatus {
        http: RAGATE_STATUS_READY,
        index: index_status,
        passages: index.len(),
        cache: cache_status,
        cache_store: store.name(),
        embedder_mode,
    };

    let is_ready =
        components.index == RAGATE_STATUS_READY && components.cache == RAGATE_STATUS_READY;

    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "pending" };

    let mut headers = HeaderMap::new();
    headers.insert(RAGATE_STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
