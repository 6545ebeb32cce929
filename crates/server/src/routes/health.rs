use crate::error::{ServerError, ServerResult};
use crate::state::{ModelStatus, ServerState};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "dupfinder-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness check endpoint
///
/// 503 while a requested preload is still running or after it failed. A lazily
/// loaded model counts as ready: the first embed request brings it up.
pub async fn readiness_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let (status, ready, model) = match state.model_status() {
        ModelStatus::Loaded(info) => (
            StatusCode::OK,
            "ready",
            json!({ "state": "loaded", "info": info }),
        ),
        ModelStatus::Lazy => (StatusCode::OK, "ready", json!({ "state": "lazy" })),
        ModelStatus::Loading => (
            StatusCode::SERVICE_UNAVAILABLE,
            "not_ready",
            json!({ "state": "loading" }),
        ),
        ModelStatus::Failed(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "not_ready",
            json!({ "state": "failed", "error": err }),
        ),
    };

    (
        status,
        Json(json!({
            "status": ready,
            "service": "dupfinder-server",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "uptime_seconds": uptime_seconds(),
            "duplicate_threshold": state.detector.threshold(),
            "components": {
                "api": "ready",
                "model": model,
            }
        })),
    )
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let handle = state.metrics.as_ref().ok_or(ServerError::NotFound)?;
    metrics::gauge!("dupfinder_uptime_seconds").set(uptime_seconds() as f64);

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
