//! Liveness and metrics endpoints.

use crate::http::AppState;
use crate::metrics;
use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde_json::{json, Value};

/// `GET /health`.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": state.engine.config().service_name,
    }))
}

/// `GET /metrics`.
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render(),
    )
}
