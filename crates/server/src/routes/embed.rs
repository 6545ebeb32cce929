use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use dupfinder::{BatchEmbedding, DetectorError, Embedding};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Deserialize)]
pub struct EmbedRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct EmbedBatchRequest {
    pub texts: Vec<String>,
}

/// `POST /embed`
pub async fn embed_text(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<EmbedRequest>, JsonRejection>,
) -> ServerResult<Json<Embedding>> {
    let Json(request) = payload?;
    let detector = state.detector.clone();

    let started = Instant::now();
    let embedding = run_blocking(move || detector.embed(&request.text)).await?;
    record_encode(1, started);

    Ok(Json(embedding))
}

/// `POST /embed/batch`
pub async fn embed_batch(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<EmbedBatchRequest>, JsonRejection>,
) -> ServerResult<Json<BatchEmbedding>> {
    let Json(request) = payload?;
    let detector = state.detector.clone();

    let started = Instant::now();
    let batch = run_blocking(move || detector.embed_batch(&request.texts)).await?;
    record_encode(batch.count, started);

    tracing::debug!(count = batch.count, dimension = batch.dimension, "embedded batch");
    Ok(Json(batch))
}

/// Runs model work off the async executor.
async fn run_blocking<T, F>(work: F) -> ServerResult<T>
where
    F: FnOnce() -> Result<T, DetectorError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| ServerError::Internal(format!("encode task failed: {err}")))?
        .map_err(ServerError::from)
}

fn record_encode(texts: usize, started: Instant) {
    metrics::counter!("dupfinder_texts_embedded_total").increment(texts as u64);
    metrics::histogram!("dupfinder_encode_duration_seconds").record(started.elapsed().as_secs_f64());
}
