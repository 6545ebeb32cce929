use std::fs;

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

use crate::assets::ModelAssets;
use crate::config::Pooling;
use crate::device::{candle_device, ComputeDevice};
use crate::types::{EmbeddingVector, TextEncoder};
use crate::SemanticError;

/// BERT-family sentence encoder running on candle.
pub(crate) struct BertEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    compute: ComputeDevice,
    pooling: Pooling,
    dimension: usize,
}

impl BertEncoder {
    pub(crate) fn load(
        assets: &ModelAssets,
        requested: ComputeDevice,
        pooling: Pooling,
        max_sequence_length: usize,
    ) -> Result<Self, SemanticError> {
        let (device, compute) = candle_device(requested);

        let config: Config = serde_json::from_str(&fs::read_to_string(&assets.config_path)?)
            .map_err(|e| SemanticError::ModelLoad(format!("model config: {e}")))?;

        let mut tokenizer = Tokenizer::from_file(&assets.tokenizer_path)
            .map_err(|e| SemanticError::ModelLoad(format!("tokenizer: {e}")))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..Default::default()
        }));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_sequence_length,
                ..Default::default()
            }))
            .map_err(|e| SemanticError::ModelLoad(format!("tokenizer truncation: {e}")))?;

        let weights = fs::read(&assets.weights_path)?;
        let vb = VarBuilder::from_buffered_safetensors(weights, DType::F32, &device)
            .map_err(|e| SemanticError::ModelLoad(format!("weights: {e}")))?;
        let model = BertModel::load(vb, &config)
            .map_err(|e| SemanticError::ModelLoad(format!("bert: {e}")))?;

        Ok(Self {
            model,
            tokenizer,
            device,
            compute,
            pooling,
            dimension: config.hidden_size,
        })
    }

    fn forward(&self, texts: &[&str]) -> Result<Tensor, SemanticError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| SemanticError::Inference(format!("tokenize: {e}")))?;

        let ids = encodings
            .iter()
            .map(|e| Tensor::new(e.get_ids(), &self.device))
            .collect::<Result<Vec<_>, _>>()?;
        let masks = encodings
            .iter()
            .map(|e| Tensor::new(e.get_attention_mask(), &self.device))
            .collect::<Result<Vec<_>, _>>()?;

        let input_ids = Tensor::stack(&ids, 0)?;
        let attention_mask = Tensor::stack(&masks, 0)?;
        let token_type_ids = input_ids.zeros_like()?;

        // (batch, seq, hidden)
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        let pooled = match self.pooling {
            Pooling::Cls => hidden.i((.., 0))?,
            Pooling::Mean => {
                let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
                let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
                let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
                summed.broadcast_div(&counts)?
            }
        };
        Ok(pooled)
    }
}

impl TextEncoder for BertEncoder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn device(&self) -> ComputeDevice {
        self.compute
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, SemanticError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let pooled = self.forward(texts)?;
        let vectors: Vec<EmbeddingVector> = pooled.to_dtype(DType::F32)?.to_vec2()?;
        if vectors.len() != texts.len() {
            return Err(SemanticError::Inference(format!(
                "model returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors)
    }
}
