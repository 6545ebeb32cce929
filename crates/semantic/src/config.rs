use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::SemanticError;

/// Which encoder backs the provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EncoderMode {
    /// Pretrained transformer run locally through candle.
    #[default]
    Model,
    /// Deterministic hash-derived vectors. No weights, no network.
    Stub,
}

/// Requested compute device. `Auto` asks the [`DeviceSelector`](crate::DeviceSelector).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    #[default]
    Auto,
    Cpu,
    Cuda,
}

/// How token states are reduced to one sentence vector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pooling {
    /// First token (`[CLS]`) hidden state. What the BGE family is trained for.
    #[default]
    Cls,
    /// Attention-masked mean over all tokens.
    Mean,
}

/// Runtime configuration describing which model to load and how to post-process vectors.
///
/// # Example
/// ```no_run
/// use semantic::{EncoderMode, ModelProvider, SemanticConfig};
///
/// let cfg = SemanticConfig {
///     mode: EncoderMode::Model,
///     model_id: "BAAI/bge-large-en-v1.5".into(),
///     batch_size: 16,
///     ..Default::default()
/// };
///
/// let provider = ModelProvider::new(cfg);
/// let vector = provider.encode("This is a test.").unwrap();
/// assert_eq!(vector.len(), 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SemanticConfig {
    /// Encoder backend.
    pub mode: EncoderMode,
    /// Hugging Face Hub repository holding `config.json`, `tokenizer.json` and
    /// `model.safetensors`.
    pub model_id: String,
    /// Hub revision (branch, tag or commit).
    pub revision: String,
    /// Local directory with the three model files. Checked before the hub.
    pub model_dir: Option<PathBuf>,
    /// Override for the hub download cache.
    pub cache_dir: Option<PathBuf>,
    /// Compute device preference.
    pub device: DevicePreference,
    /// Sentence pooling strategy.
    pub pooling: Pooling,
    /// Longer inputs are truncated to this many tokens.
    pub max_sequence_length: usize,
    /// Texts per forward pass in [`encode_batch`](crate::ModelProvider::encode_batch).
    pub batch_size: usize,
    /// Normalize outputs to unit length.
    pub normalize: bool,
    /// Output dimension of the stub encoder.
    pub stub_dimension: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            mode: EncoderMode::Model,
            model_id: "BAAI/bge-large-en-v1.5".into(),
            revision: "main".into(),
            model_dir: None,
            cache_dir: None,
            device: DevicePreference::Auto,
            pooling: Pooling::Cls,
            max_sequence_length: 512,
            batch_size: 32,
            normalize: true,
            stub_dimension: 1024,
        }
    }
}

impl SemanticConfig {
    /// Stub-backed config, handy for tests and offline development.
    pub fn stub() -> Self {
        Self {
            mode: EncoderMode::Stub,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SemanticError> {
        if self.batch_size == 0 {
            return Err(SemanticError::InvalidConfig(
                "batch_size must be greater than zero".into(),
            ));
        }
        if self.max_sequence_length == 0 {
            return Err(SemanticError::InvalidConfig(
                "max_sequence_length must be greater than zero".into(),
            ));
        }
        if self.mode == EncoderMode::Stub && self.stub_dimension == 0 {
            return Err(SemanticError::InvalidConfig(
                "stub_dimension must be greater than zero".into(),
            ));
        }
        if self.mode == EncoderMode::Model && self.model_dir.is_none() && self.model_id.is_empty()
        {
            return Err(SemanticError::InvalidConfig(
                "either model_dir or model_id is required in model mode".into(),
            ));
        }
        Ok(())
    }
}
