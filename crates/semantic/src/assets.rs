use std::path::{Path, PathBuf};

use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};

use crate::{SemanticConfig, SemanticError};

const CONFIG_FILE: &str = "config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const WEIGHTS_FILE: &str = "model.safetensors";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ModelAssets {
    pub(crate) config_path: PathBuf,
    pub(crate) tokenizer_path: PathBuf,
    pub(crate) weights_path: PathBuf,
}

impl ModelAssets {
    fn in_dir(dir: &Path) -> Self {
        Self {
            config_path: dir.join(CONFIG_FILE),
            tokenizer_path: dir.join(TOKENIZER_FILE),
            weights_path: dir.join(WEIGHTS_FILE),
        }
    }

    fn all_present(&self) -> bool {
        self.config_path.exists() && self.tokenizer_path.exists() && self.weights_path.exists()
    }
}

/// Locates the model files, preferring `cfg.model_dir` and otherwise fetching
/// them from the hub (cached on disk after the first download).
///
/// A configured `model_dir` that is missing files is an error only when there
/// is no hub id to fall back on.
pub(crate) fn resolve_model_assets(cfg: &SemanticConfig) -> Result<ModelAssets, SemanticError> {
    if let Some(dir) = &cfg.model_dir {
        let local = ModelAssets::in_dir(dir);
        if local.all_present() {
            tracing::debug!(dir = %dir.display(), "using local model files");
            return Ok(local);
        }
        if cfg.model_id.is_empty() {
            return Err(SemanticError::ModelLoad(format!(
                "{} must contain {CONFIG_FILE}, {TOKENIZER_FILE} and {WEIGHTS_FILE}",
                dir.display()
            )));
        }
        tracing::warn!(
            dir = %dir.display(),
            model_id = %cfg.model_id,
            "local model directory incomplete, fetching from hub"
        );
    }

    fetch_from_hub(cfg)
}

fn fetch_from_hub(cfg: &SemanticConfig) -> Result<ModelAssets, SemanticError> {
    let mut builder = ApiBuilder::new().with_progress(false);
    if let Some(cache_dir) = &cfg.cache_dir {
        builder = builder.with_cache_dir(cache_dir.clone());
    }
    let api = builder.build()?;
    let repo = api.repo(Repo::with_revision(
        cfg.model_id.clone(),
        RepoType::Model,
        cfg.revision.clone(),
    ));

    tracing::info!(model_id = %cfg.model_id, revision = %cfg.revision, "resolving model from hub");

    Ok(ModelAssets {
        config_path: repo.get(CONFIG_FILE)?,
        tokenizer_path: repo.get(TOKENIZER_FILE)?,
        weights_path: repo.get(WEIGHTS_FILE)?,
    })
}
