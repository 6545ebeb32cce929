//! dupfinder semantic embeddings
//!
//! This crate turns text into unit-length vectors you can compare with a dot
//! product. It owns one thing that matters: the embedding model, which is big
//! and slow to bring up, so it is loaded once per process on first use and
//! then shared by every request.
//!
//! Two encoders are available:
//!
//! - **Model mode** - a BERT-family sentence encoder (default
//!   `BAAI/bge-large-en-v1.5`, 1024 dims) run locally with candle. Weights come
//!   from `model_dir` when present, otherwise from the Hugging Face Hub cache
//!   (downloaded on the very first run, ~1.3 GB).
//! - **Stub mode** - deterministic hash-derived vectors. No weights, no
//!   network. Good for tests, useless for actual duplicate detection.
//!
//! ## Devices
//!
//! `device = "auto"` asks a [`DeviceSelector`] once, while the model loads.
//! When CUDA was requested but cannot be opened we log a warning and run on
//! the CPU instead of failing.
//!
//! ## Threading notes
//!
//! [`ModelProvider`] is `Send + Sync`. Callers racing on the very first
//! request all wait for a single load and then share the same handle. All
//! methods are blocking; async callers should use `spawn_blocking`.
//!
//! ## Quick example
//!
//! ```no_run
//! use semantic::{ModelProvider, SemanticConfig};
//!
//! let provider = ModelProvider::new(SemanticConfig::default());
//! let one = provider.encode("Sample text for embedding").unwrap();
//! let many = provider.encode_batch(&["First", "Second", "Third"]).unwrap();
//! assert_eq!(many[0].len(), one.len());
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod types;

mod assets;
mod bert;
mod cache;
mod normalize;
mod provider;
mod stub;

pub use crate::cache::{ModelHandle, ModelLoader};
pub use crate::config::{DevicePreference, EncoderMode, Pooling, SemanticConfig};
pub use crate::device::{ComputeDevice, CudaProbe, DeviceSelector, FixedDevice};
pub use crate::error::SemanticError;
pub use crate::normalize::l2_norm;
pub use crate::provider::ModelProvider;
pub use crate::stub::StubEncoder;
pub use crate::types::{EmbeddingVector, ModelInfo, TextEncoder};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn provider_is_shareable() {
        assert_send_sync::<ModelProvider>();
    }

    #[test]
    #[ignore = "downloads BAAI/bge-large-en-v1.5 (~1.3 GB) from the Hugging Face Hub"]
    fn real_model_inference() {
        let provider = ModelProvider::new(SemanticConfig {
            device: DevicePreference::Cpu,
            ..SemanticConfig::default()
        });

        let vector = provider
            .encode("Sample text for testing")
            .expect("inference should succeed with real model");
        assert_eq!(vector.len(), 1024);
        assert!((l2_norm(&vector) - 1.0).abs() < 0.01);

        let cats = provider.encode("This is about cats").unwrap();
        let dogs = provider.encode("This is about dogs").unwrap();
        assert_ne!(cats, dogs);

        let texts = ["First", "Second"];
        let batch = provider.encode_batch(&texts).unwrap();
        for (text, batched) in texts.iter().zip(batch.iter()) {
            let single = provider.encode(text).unwrap();
            for (a, b) in single.iter().zip(batched.iter()) {
                assert!((a - b).abs() < 1e-4, "{a} vs {b}");
            }
        }
    }

    #[test]
    #[ignore = "requires local model files under models/bge-large-en-v1.5"]
    fn real_model_from_local_dir() {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let model_dir = manifest_dir
            .parent()
            .and_then(|p| p.parent())
            .expect("workspace root")
            .join("models")
            .join("bge-large-en-v1.5");

        let provider = ModelProvider::new(SemanticConfig {
            model_dir: Some(model_dir),
            model_id: String::new(),
            device: DevicePreference::Cpu,
            ..SemanticConfig::default()
        });

        let vector = provider.encode("hello world").unwrap();
        assert_eq!(provider.model_info().unwrap().dimension, vector.len());
    }
}
