//! # dupfinder matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` decides whether two embeddings describe the same content. It is
//! pure arithmetic: no model, no I/O, no shared state, so every function here
//! is safe to call from any thread without coordination.
//!
//! ## Core Types
//!
//! - [`cosine_similarity`]: `dot(a, b) / (|a| * |b|)`, with zero-magnitude
//!   inputs defined as `0.0`.
//! - [`DuplicateClassifier`]: holds the duplicate threshold
//!   ([`DEFAULT_DUPLICATE_THRESHOLD`] = 0.85, calibrated for
//!   `BAAI/bge-large-en-v1.5`) and turns a similarity into a verdict.
//! - [`SimilarityScore`]: similarity, verdict, and the threshold used.
//! - [`MatchError`]: precondition violations (empty or mismatched vectors,
//!   non-finite components, out-of-range thresholds).
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{DuplicateClassifier, SimilarityScore};
//!
//! let classifier = DuplicateClassifier::default();
//! let SimilarityScore { similarity, is_duplicate, threshold } = classifier
//!     .classify(&[1.0, 0.0, 0.0], &[0.9, 0.1, 0.0])
//!     .expect("equal-length vectors");
//!
//! assert!(similarity >= threshold);
//! assert!(is_duplicate);
//! ```

pub mod engine;
pub mod types;

pub use crate::engine::{classify_duplicate, cosine_similarity, DuplicateClassifier};
pub use crate::types::{MatchError, SimilarityScore, DEFAULT_DUPLICATE_THRESHOLD};
