use serde::{Deserialize, Serialize};

use crate::device::ComputeDevice;
use crate::SemanticError;

/// Fixed-length text embedding. Unit length when produced by a normalizing provider.
pub type EmbeddingVector = Vec<f32>;

/// A loaded text encoder. This is the model handle the provider caches.
///
/// Implementations are shared read-only across request threads after
/// construction, so every method takes `&self`.
pub trait TextEncoder: Send + Sync {
    /// Output dimension. Constant for the lifetime of the encoder.
    fn dimension(&self) -> usize;

    /// Device the encoder runs on.
    fn device(&self) -> ComputeDevice;

    /// Raw (not yet normalized) vectors for `texts`, one per input, same order.
    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, SemanticError>;
}

/// Describes the loaded model, surfaced by readiness probes and logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    /// Hub id, local directory, or `"stub"`.
    pub model_name: String,
    pub dimension: usize,
    pub device: ComputeDevice,
    pub normalized: bool,
}
