use std::io;
use thiserror::Error;

/// Errors surfaced by the [`ModelProvider`](crate::ModelProvider).
#[derive(Debug, Error)]
pub enum SemanticError {
    /// Caller broke an input precondition (empty text, empty batch, blank entry).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Configuration is inconsistent (e.g., a zero batch size).
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// Unable to fetch model assets from the hub.
    #[error("download failed: {0}")]
    Download(String),
    /// Weights, model config, or tokenizer could not be turned into a model.
    #[error("model load failed: {0}")]
    ModelLoad(String),
    /// Low-level IO failures while touching the filesystem.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Tokenizer or tensor errors after the model is loaded.
    #[error("inference failure: {0}")]
    Inference(String),
}

impl SemanticError {
    /// True when the model could not be brought up, as opposed to a bad request
    /// or a failure while running an already loaded model.
    pub fn is_initialization_failure(&self) -> bool {
        matches!(
            self,
            SemanticError::Download(_) | SemanticError::ModelLoad(_) | SemanticError::Io(_)
        )
    }
}

impl From<candle_core::Error> for SemanticError {
    fn from(err: candle_core::Error) -> Self {
        SemanticError::Inference(err.to_string())
    }
}

impl From<hf_hub::api::sync::ApiError> for SemanticError {
    fn from(err: hf_hub::api::sync::ApiError) -> Self {
        SemanticError::Download(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_input() {
        let err = SemanticError::InvalidInput("text must not be empty".into());
        assert!(err.to_string().contains("invalid input"));
        assert!(err.to_string().contains("text must not be empty"));
        assert!(!err.is_initialization_failure());
    }

    #[test]
    fn error_download_is_initialization_failure() {
        let err = SemanticError::Download("network timeout".into());
        assert!(err.to_string().contains("download failed"));
        assert!(err.is_initialization_failure());
    }

    #[test]
    fn error_model_load_is_initialization_failure() {
        let err = SemanticError::ModelLoad("bad safetensors header".into());
        assert!(err.to_string().contains("model load failed"));
        assert!(err.is_initialization_failure());
    }

    #[test]
    fn error_inference_is_not_initialization_failure() {
        let err = SemanticError::Inference("shape mismatch".into());
        assert!(err.to_string().contains("inference failure"));
        assert!(!err.is_initialization_failure());
    }

    #[test]
    fn error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: SemanticError = io_err.into();
        assert!(err.to_string().contains("io error"));
        assert!(err.is_initialization_failure());
    }

    #[test]
    fn error_debug_formatting() {
        let err = SemanticError::InvalidConfig("batch_size".into());
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("InvalidConfig"));
        assert!(debug_str.contains("batch_size"));
    }
}
