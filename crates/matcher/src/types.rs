use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Threshold calibrated for `BAAI/bge-large-en-v1.5` embeddings.
pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.85;

/// Result of comparing two vectors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimilarityScore {
    /// Cosine similarity. In [-1.0, 1.0] for normalized inputs.
    pub similarity: f64,
    /// `similarity >= threshold`.
    pub is_duplicate: bool,
    /// Threshold the verdict was computed against.
    pub threshold: f64,
}

/// Precondition violations on comparison inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("vectors must not be empty")]
    EmptyVector,
    #[error("vector dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
    #[error("vector contains a non-finite value at index {index}")]
    NonFinite { index: usize },
    #[error("invalid threshold {0}: must be a finite value in [-1, 1]")]
    InvalidThreshold(f64),
}
