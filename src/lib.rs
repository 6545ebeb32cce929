//! Workspace umbrella crate for dupfinder.
//!
//! This crate stitches the model provider (`semantic`) and the similarity
//! engine (`matcher`) into the three operations the service exposes:
//! embed one text, embed a batch, and compare two vectors. Nothing here knows
//! about HTTP; the `server` crate is a thin layer over [`DuplicateDetector`].

pub use matcher::{
    classify_duplicate, cosine_similarity, DuplicateClassifier, MatchError, SimilarityScore,
    DEFAULT_DUPLICATE_THRESHOLD,
};
pub use semantic::{
    l2_norm, ComputeDevice, DevicePreference, DeviceSelector, EmbeddingVector, EncoderMode,
    ModelInfo, ModelProvider, Pooling, SemanticConfig, SemanticError, TextEncoder,
};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors from the detector operations.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Coarse classification used to pick a transport-level response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something the core refuses to process.
    InvalidInput,
    /// The model could not be brought up.
    ModelUnavailable,
    /// The loaded model failed while running.
    Inference,
    /// The service itself is misconfigured.
    Configuration,
}

impl DetectorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DetectorError::Match(MatchError::InvalidThreshold(_)) => ErrorKind::Configuration,
            DetectorError::Match(_) => ErrorKind::InvalidInput,
            DetectorError::Semantic(SemanticError::InvalidInput(_)) => ErrorKind::InvalidInput,
            DetectorError::Semantic(SemanticError::InvalidConfig(_)) => ErrorKind::Configuration,
            DetectorError::Semantic(err) if err.is_initialization_failure() => {
                ErrorKind::ModelUnavailable
            }
            DetectorError::Semantic(_) => ErrorKind::Inference,
        }
    }
}

/// Output of embed-single.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    pub embedding: EmbeddingVector,
    pub dimension: usize,
}

/// Output of embed-batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchEmbedding {
    pub embeddings: Vec<EmbeddingVector>,
    pub dimension: usize,
    pub count: usize,
}

/// Embedding and duplicate detection over a shared model provider.
///
/// Cloning is cheap; clones share the provider and therefore the model.
#[derive(Clone)]
pub struct DuplicateDetector {
    provider: Arc<ModelProvider>,
    classifier: DuplicateClassifier,
}

impl DuplicateDetector {
    /// Builds a detector with a fresh provider. The model is not loaded yet.
    pub fn new(cfg: SemanticConfig, threshold: f64) -> Result<Self, DetectorError> {
        Ok(Self::from_parts(
            Arc::new(ModelProvider::new(cfg)),
            DuplicateClassifier::new(threshold)?,
        ))
    }

    pub fn from_parts(provider: Arc<ModelProvider>, classifier: DuplicateClassifier) -> Self {
        Self {
            provider,
            classifier,
        }
    }

    pub fn provider(&self) -> &Arc<ModelProvider> {
        &self.provider
    }

    pub fn threshold(&self) -> f64 {
        self.classifier.threshold()
    }

    /// Loads the model now instead of on the first request.
    pub fn warm_up(&self) -> Result<ModelInfo, DetectorError> {
        self.provider.get_model()?;
        self.provider.model_info().ok_or_else(|| {
            SemanticError::Inference("model reported loaded but has no info".into()).into()
        })
    }

    /// embed-single.
    pub fn embed(&self, text: &str) -> Result<Embedding, DetectorError> {
        let embedding = self.provider.encode(text)?;
        Ok(Embedding {
            dimension: embedding.len(),
            embedding,
        })
    }

    /// embed-batch.
    pub fn embed_batch<T: AsRef<str>>(&self, texts: &[T]) -> Result<BatchEmbedding, DetectorError> {
        let embeddings = self.provider.encode_batch(texts)?;
        let dimension = embeddings.first().map(Vec::len).unwrap_or_default();
        Ok(BatchEmbedding {
            count: embeddings.len(),
            dimension,
            embeddings,
        })
    }

    /// compare. Accepts `f32` embeddings or `f64` client vectors; both are
    /// scored in `f64`.
    pub fn compare<T>(&self, a: &[T], b: &[T]) -> Result<SimilarityScore, DetectorError>
    where
        T: Copy + Into<f64>,
    {
        let score = self.classifier.classify(a, b)?;
        tracing::debug!(
            similarity = score.similarity,
            is_duplicate = score.is_duplicate,
            dimension = a.len(),
            "compared vectors"
        );
        Ok(score)
    }

    /// Embeds both texts in one batch and compares them.
    pub fn compare_texts(&self, a: &str, b: &str) -> Result<SimilarityScore, DetectorError> {
        let vectors = self.provider.encode_batch(&[a, b])?;
        self.compare(&vectors[0], &vectors[1])
    }
}
