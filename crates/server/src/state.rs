use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use dupfinder::{DuplicateDetector, ModelInfo};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Process-wide Prometheus recorder. `metrics` allows one global recorder, so
/// every state built in this process renders from the same handle.
static PROMETHEUS: OnceCell<PrometheusHandle> = OnceCell::new();

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Embedding and duplicate detection (shared across requests)
    pub detector: DuplicateDetector,

    /// Renders `/metrics`; `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,

    /// Set when a startup preload failed
    preload_error: Arc<OnceCell<String>>,
}

/// Where the embedding model is in its lifecycle.
#[derive(Debug, Clone)]
pub enum ModelStatus {
    Loaded(ModelInfo),
    /// Preload requested and still running
    Loading,
    /// Loads on the first embed request
    Lazy,
    Failed(String),
}

impl ServerState {
    /// Create new server state. The model is not loaded here.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let detector =
            DuplicateDetector::new(config.semantic.clone(), config.duplicate_threshold)?;
        Self::with_detector(config, detector)
    }

    /// State around an existing detector, e.g. one built over a custom loader.
    pub fn with_detector(config: ServerConfig, detector: DuplicateDetector) -> ServerResult<Self> {
        let metrics = if config.metrics_enabled {
            Some(prometheus_handle()?)
        } else {
            None
        };

        Ok(Self {
            config: Arc::new(config),
            detector,
            metrics,
            preload_error: Arc::new(OnceCell::new()),
        })
    }

    pub fn model_status(&self) -> ModelStatus {
        if let Some(info) = self.detector.provider().model_info() {
            return ModelStatus::Loaded(info);
        }
        if let Some(err) = self.preload_error.get() {
            return ModelStatus::Failed(err.clone());
        }
        if self.config.preload_model {
            ModelStatus::Loading
        } else {
            ModelStatus::Lazy
        }
    }

    /// Loads the model on the blocking pool. Failures are logged and reported
    /// through [`ServerState::model_status`]; requests still retry the load.
    pub async fn preload_model(&self) {
        let detector = self.detector.clone();
        let outcome = tokio::task::spawn_blocking(move || detector.warm_up()).await;

        match outcome {
            Ok(Ok(info)) => tracing::info!(
                model = %info.model_name,
                dimension = info.dimension,
                device = ?info.device,
                "model preloaded"
            ),
            Ok(Err(err)) => {
                tracing::error!(error = %err, "model preload failed");
                let _ = self.preload_error.set(err.to_string());
            }
            Err(err) => {
                tracing::error!(error = %err, "model preload task failed");
                let _ = self.preload_error.set(err.to_string());
            }
        }
    }
}

fn prometheus_handle() -> ServerResult<PrometheusHandle> {
    PROMETHEUS
        .get_or_try_init(|| PrometheusBuilder::new().install_recorder())
        .cloned()
        .map_err(|err| ServerError::Config(format!("metrics recorder: {err}")))
}
