use std::sync::Arc;

use crate::cache::{load_encoder, ModelHandle, ModelLoader, ModelSlot};
use crate::device::{resolve_device, ComputeDevice, CudaProbe, DeviceSelector};
use crate::normalize::l2_normalize_in_place;
use crate::types::{EmbeddingVector, ModelInfo};
use crate::{EncoderMode, SemanticConfig, SemanticError};

/// Owns the embedding model for the whole process.
///
/// The model is built on the first call that needs it and reused afterwards.
/// Share one provider (behind an `Arc`) between all request handlers.
pub struct ModelProvider {
    cfg: SemanticConfig,
    selector: Arc<dyn DeviceSelector>,
    loader: ModelLoader,
    slot: ModelSlot,
}

impl ModelProvider {
    pub fn new(cfg: SemanticConfig) -> Self {
        Self {
            cfg,
            selector: Arc::new(CudaProbe),
            loader: Box::new(load_encoder),
            slot: ModelSlot::default(),
        }
    }

    /// Replaces the device capability query consulted when `device = "auto"`.
    pub fn with_selector<S>(mut self, selector: S) -> Self
    where
        S: DeviceSelector + 'static,
    {
        self.selector = Arc::new(selector);
        self
    }

    /// Replaces the model constructor.
    pub fn with_loader<F>(mut self, loader: F) -> Self
    where
        F: Fn(&SemanticConfig, ComputeDevice) -> Result<ModelHandle, SemanticError>
            + Send
            + Sync
            + 'static,
    {
        self.loader = Box::new(loader);
        self
    }

    pub fn config(&self) -> &SemanticConfig {
        &self.cfg
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Details of the loaded model, `None` before the first load.
    pub fn model_info(&self) -> Option<ModelInfo> {
        self.slot.get().map(|handle| ModelInfo {
            model_name: self.model_name(),
            dimension: handle.dimension(),
            device: handle.device(),
            normalized: self.cfg.normalize,
        })
    }

    /// Returns the shared model handle, building it on first use.
    ///
    /// Blocks for as long as the first load takes (possibly a multi-GB
    /// download). Load failures are returned to the caller and not retried here.
    pub fn get_model(&self) -> Result<ModelHandle, SemanticError> {
        self.slot.get_or_load(|| {
            self.cfg.validate()?;
            let device = resolve_device(self.cfg.device, self.selector.as_ref());
            tracing::info!(model = %self.model_name(), ?device, "loading embedding model");
            (self.loader)(&self.cfg, device).inspect_err(|err| {
                tracing::error!(model = %self.model_name(), error = %err, "embedding model failed to load");
            })
        })
    }

    /// Embeds one text.
    pub fn encode(&self, text: &str) -> Result<EmbeddingVector, SemanticError> {
        let mut vectors = self.encode_batch(&[text])?;
        vectors
            .pop()
            .ok_or_else(|| SemanticError::Inference("model returned no outputs".into()))
    }

    /// Embeds every text, preserving order.
    ///
    /// Inputs are run through the model `batch_size` at a time. Grouping only
    /// affects throughput; each vector matches what [`encode`](Self::encode)
    /// returns for the same text.
    pub fn encode_batch<T>(&self, texts: &[T]) -> Result<Vec<EmbeddingVector>, SemanticError>
    where
        T: AsRef<str>,
    {
        validate_texts(texts)?;
        let model = self.get_model()?;
        let dimension = model.dimension();

        let mut results = Vec::with_capacity(texts.len());
        for group in texts.chunks(self.cfg.batch_size.max(1)) {
            let refs: Vec<&str> = group.iter().map(AsRef::as_ref).collect();
            let vectors = model.embed(&refs)?;
            if vectors.len() != refs.len() {
                return Err(SemanticError::Inference(format!(
                    "model returned {} embeddings for {} inputs",
                    vectors.len(),
                    refs.len()
                )));
            }
            for mut vector in vectors {
                if vector.len() != dimension {
                    return Err(SemanticError::Inference(format!(
                        "model returned a {}-dimensional vector, expected {dimension}",
                        vector.len()
                    )));
                }
                if self.cfg.normalize {
                    l2_normalize_in_place(&mut vector)?;
                }
                results.push(vector);
            }
        }

        tracing::debug!(count = results.len(), dimension, "encoded texts");
        Ok(results)
    }

    fn model_name(&self) -> String {
        match (self.cfg.mode, &self.cfg.model_dir) {
            (EncoderMode::Stub, _) => "stub".to_string(),
            (EncoderMode::Model, Some(dir)) if self.cfg.model_id.is_empty() => {
                dir.display().to_string()
            }
            (EncoderMode::Model, _) => self.cfg.model_id.clone(),
        }
    }
}

fn validate_texts<T: AsRef<str>>(texts: &[T]) -> Result<(), SemanticError> {
    if texts.is_empty() {
        return Err(SemanticError::InvalidInput(
            "at least one text is required".into(),
        ));
    }
    if let Some(idx) = texts.iter().position(|t| t.as_ref().trim().is_empty()) {
        return Err(SemanticError::InvalidInput(format!(
            "text at index {idx} is empty or whitespace only"
        )));
    }
    Ok(())
}
