//! API route handlers
//!
//! - `health`: liveness, readiness and Prometheus metrics
//! - `embed`: single and batch text embedding
//! - `similarity`: cosine similarity and duplicate verdict for two vectors

pub mod embed;
pub mod health;
pub mod similarity;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// # Response
///
/// ```json
/// {
///   "name": "dupfinder",
///   "version": "0.1.0",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "dupfinder",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/embed",
            "/embed/batch",
            "/similarity",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
