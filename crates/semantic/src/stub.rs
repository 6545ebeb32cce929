use fxhash::hash64;

use crate::device::ComputeDevice;
use crate::types::{EmbeddingVector, TextEncoder};
use crate::SemanticError;

/// Deterministic stand-in for the real model.
///
/// Values are sinusoids seeded from an fxhash of the text, so identical text
/// always yields identical vectors and different text almost always differs.
/// Carries no semantics: only use it for tests and offline development.
#[derive(Debug, Clone)]
pub struct StubEncoder {
    dimension: usize,
}

impl StubEncoder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn vector_for(&self, text: &str) -> EmbeddingVector {
        let h = hash64(text.as_bytes());
        (0..self.dimension)
            .map(|idx| {
                let shifted = h.rotate_left((idx % 64) as u32);
                ((shifted >> 40) as f32 * 1e-4 + idx as f32 * 0.01).sin()
            })
            .collect()
    }
}

impl TextEncoder for StubEncoder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn device(&self) -> ComputeDevice {
        ComputeDevice::Fallback
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, SemanticError> {
        Ok(texts.iter().map(|text| self.vector_for(text)).collect())
    }
}
