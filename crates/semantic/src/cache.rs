use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Instant;

use crate::assets::resolve_model_assets;
use crate::bert::BertEncoder;
use crate::config::EncoderMode;
use crate::device::ComputeDevice;
use crate::stub::StubEncoder;
use crate::types::TextEncoder;
use crate::{SemanticConfig, SemanticError};

/// Shared, immutable model handle.
pub type ModelHandle = Arc<dyn TextEncoder>;

/// Builds a model handle for the negotiated device.
pub type ModelLoader =
    Box<dyn Fn(&SemanticConfig, ComputeDevice) -> Result<ModelHandle, SemanticError> + Send + Sync>;

/// Holds at most one model handle.
///
/// Concurrent first callers block on the same initialization; every caller
/// observes the same `Arc`. A failed load leaves the slot empty so the next
/// request starts over.
#[derive(Default)]
pub(crate) struct ModelSlot {
    cell: OnceCell<ModelHandle>,
}

impl ModelSlot {
    pub(crate) fn get(&self) -> Option<&ModelHandle> {
        self.cell.get()
    }

    pub(crate) fn get_or_load<F>(&self, load: F) -> Result<ModelHandle, SemanticError>
    where
        F: FnOnce() -> Result<ModelHandle, SemanticError>,
    {
        self.cell.get_or_try_init(load).cloned()
    }
}

/// Default loader: stub in stub mode, candle BERT otherwise.
pub(crate) fn load_encoder(
    cfg: &SemanticConfig,
    device: ComputeDevice,
) -> Result<ModelHandle, SemanticError> {
    let started = Instant::now();
    let handle: ModelHandle = match cfg.mode {
        EncoderMode::Stub => Arc::new(StubEncoder::new(cfg.stub_dimension)),
        EncoderMode::Model => {
            let assets = resolve_model_assets(cfg)?;
            Arc::new(BertEncoder::load(
                &assets,
                device,
                cfg.pooling,
                cfg.max_sequence_length,
            )?)
        }
    };

    tracing::info!(
        mode = ?cfg.mode,
        model_id = %cfg.model_id,
        device = ?handle.device(),
        dimension = handle.dimension(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "embedding model loaded"
    );
    Ok(handle)
}
