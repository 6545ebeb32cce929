//! dupfinder server - HTTP REST API for text embeddings and duplicate detection
//!
//! Exposes [`dupfinder::DuplicateDetector`] over HTTP. The embedding model is
//! loaded once per process, lazily on the first embed request unless
//! `preload_model` is set, and shared by every request afterwards.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `POST /embed` - `{ "text" }` to `{ "embedding", "dimension" }`
//! - `POST /embed/batch` - `{ "texts" }` to `{ "embeddings", "dimension", "count" }`
//! - `POST /similarity` - `{ "vector1", "vector2" }` to
//!   `{ "similarity", "is_duplicate", "threshold" }`
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe with model state
//! - `GET /metrics` - Prometheus metrics
//!
//! Errors use `{ "error": { "code", "message" } }`: invalid input is 422
//! `VALIDATION_ERROR`, a model that cannot be loaded is 503
//! `MODEL_UNAVAILABLE`, and an inference failure is 500 `INFERENCE_ERROR`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::{ModelStatus, ServerState};
