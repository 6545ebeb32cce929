use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use dupfinder::SimilarityScore;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SimilarityRequest {
    pub vector1: Vec<f64>,
    pub vector2: Vec<f64>,
}

/// `POST /similarity`
///
/// Pure arithmetic over the two vectors; never touches the model.
pub async fn compare_vectors(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<SimilarityRequest>, JsonRejection>,
) -> ServerResult<Json<SimilarityScore>> {
    let Json(request) = payload?;
    let score = state.detector.compare(&request.vector1, &request.vector2)?;

    let verdict = if score.is_duplicate { "true" } else { "false" };
    metrics::counter!("dupfinder_duplicate_verdicts_total", "is_duplicate" => verdict)
        .increment(1);

    Ok(Json(score))
}
