use crate::types::{MatchError, SimilarityScore, DEFAULT_DUPLICATE_THRESHOLD};

/// Cosine similarity between two equal-length vectors.
///
/// Components are widened to `f64` before accumulating, so `f32` model
/// embeddings and `f64` client vectors are both scored at full precision. If
/// either vector has zero magnitude the similarity is defined as `0.0`. Inputs
/// of different length are rejected rather than compared over the shorter
/// prefix.
pub fn cosine_similarity<T>(a: &[T], b: &[T]) -> Result<f64, MatchError>
where
    T: Copy + Into<f64>,
{
    check_pair(a, b)?;

    let (mut dot, mut mag_a, mut mag_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y): (f64, f64) = ((*x).into(), (*y).into());
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    if mag_a == 0.0 || mag_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (mag_a.sqrt() * mag_b.sqrt()))
}

/// Compares `a` and `b` against `threshold`.
pub fn classify_duplicate<T>(
    a: &[T],
    b: &[T],
    threshold: f64,
) -> Result<SimilarityScore, MatchError>
where
    T: Copy + Into<f64>,
{
    DuplicateClassifier::new(threshold)?.classify(a, b)
}

/// Duplicate decision rule with a fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuplicateClassifier {
    threshold: f64,
}

impl Default for DuplicateClassifier {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DUPLICATE_THRESHOLD,
        }
    }
}

impl DuplicateClassifier {
    pub fn new(threshold: f64) -> Result<Self, MatchError> {
        if !threshold.is_finite() || !(-1.0..=1.0).contains(&threshold) {
            return Err(MatchError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Verdict for an already computed similarity. The threshold itself counts
    /// as a duplicate.
    pub fn is_duplicate(&self, similarity: f64) -> bool {
        similarity >= self.threshold
    }

    pub fn score(&self, similarity: f64) -> SimilarityScore {
        SimilarityScore {
            similarity,
            is_duplicate: self.is_duplicate(similarity),
            threshold: self.threshold,
        }
    }

    pub fn classify<T>(&self, a: &[T], b: &[T]) -> Result<SimilarityScore, MatchError>
    where
        T: Copy + Into<f64>,
    {
        cosine_similarity(a, b).map(|similarity| self.score(similarity))
    }
}

fn check_pair<T>(a: &[T], b: &[T]) -> Result<(), MatchError>
where
    T: Copy + Into<f64>,
{
    if a.is_empty() || b.is_empty() {
        return Err(MatchError::EmptyVector);
    }
    if a.len() != b.len() {
        return Err(MatchError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if let Some(index) = a
        .iter()
        .chain(b.iter())
        .position(|v| !Into::<f64>::into(*v).is_finite())
    {
        return Err(MatchError::NonFinite {
            index: index % a.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn identical_vectors_score_one() {
        let v = [0.3f32, -1.2, 4.0, 0.01];
        assert!(approx(cosine_similarity(&v, &v).unwrap(), 1.0));
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).unwrap();
        assert!(approx(sim, 0.0));
    }

    #[test]
    fn opposite_vectors_score_minus_one() {
        let sim = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!(approx(sim, -1.0));
    }

    #[test]
    fn zero_vector_scores_exactly_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[0.0], &[0.0]).unwrap(), 0.0);
    }

    #[test]
    fn single_element_vectors_are_accepted() {
        assert!(approx(cosine_similarity(&[2.0], &[5.0]).unwrap(), 1.0));
        assert!(approx(cosine_similarity(&[2.0], &[-5.0]).unwrap(), -1.0));
    }

    #[test]
    fn client_vectors_keep_f64_precision_at_threshold() {
        let score = DuplicateClassifier::default()
            .classify(&[1.0f64, 0.0], &[0.849999999, 0.5267826892562055])
            .unwrap();
        assert!((score.similarity - 0.849999999).abs() < 1e-12);
        assert!(!score.is_duplicate);
    }

    #[test]
    fn values_beyond_f32_range_are_scored() {
        let sim = cosine_similarity(&[1e39f64, 0.0], &[2e39f64, 0.0]).unwrap();
        assert!(approx(sim, 1.0));
    }

    #[test]
    fn f32_embeddings_are_accepted() {
        let a = [0.6f32, 0.8];
        assert!(approx(cosine_similarity(&a, &a).unwrap(), 1.0));
    }

    #[test]
    fn magnitude_does_not_matter() {
        let a = [1.0f32, 2.0, 3.0];
        let b = [10.0f32, 20.0, 30.0];
        assert!(approx(cosine_similarity(&a, &b).unwrap(), 1.0));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert_eq!(
            cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]),
            Err(MatchError::DimensionMismatch { left: 2, right: 3 })
        );
    }

    #[test]
    fn empty_vectors_are_rejected() {
        assert_eq!(
            cosine_similarity::<f64>(&[], &[]),
            Err(MatchError::EmptyVector)
        );
        assert_eq!(cosine_similarity(&[1.0], &[]), Err(MatchError::EmptyVector));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(
            cosine_similarity(&[1.0, f32::NAN], &[1.0, 1.0]),
            Err(MatchError::NonFinite { index: 1 })
        );
        assert_eq!(
            cosine_similarity(&[1.0, 1.0, 1.0], &[1.0, 1.0, f32::INFINITY]),
            Err(MatchError::NonFinite { index: 2 })
        );
    }

    #[test]
    fn near_duplicate_is_flagged() {
        let score = classify_duplicate(&[1.0, 0.0, 0.0], &[0.9, 0.1, 0.0], 0.85).unwrap();
        assert!(score.similarity >= 0.85);
        assert!(score.is_duplicate);
        assert_eq!(score.threshold, 0.85);
    }

    #[test]
    fn distant_vector_is_not_flagged() {
        let score = classify_duplicate(&[1.0, 0.0, 0.0], &[0.5, 0.5, 0.5], 0.85).unwrap();
        assert!(score.similarity < 0.85);
        assert!(!score.is_duplicate);
    }

    #[test]
    fn threshold_boundary_counts_as_duplicate() {
        let classifier = DuplicateClassifier::default();
        assert!(classifier.is_duplicate(0.85));
        assert!(classifier.is_duplicate(0.850_000_1));
        assert!(!classifier.is_duplicate(0.849_999_9));
        assert!(classifier.score(0.85).is_duplicate);
    }

    #[test]
    fn default_threshold_is_calibrated_value() {
        assert_eq!(DuplicateClassifier::default().threshold(), 0.85);
    }

    #[test]
    fn custom_threshold_changes_verdict() {
        let strict = DuplicateClassifier::new(0.999).unwrap();
        let score = strict.classify(&[1.0, 0.0, 0.0], &[0.9, 0.1, 0.0]).unwrap();
        assert!(!score.is_duplicate);
        assert_eq!(score.threshold, 0.999);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        assert!(DuplicateClassifier::new(1.5).is_err());
        assert!(DuplicateClassifier::new(-1.01).is_err());
        assert!(DuplicateClassifier::new(f64::NAN).is_err());
        assert!(DuplicateClassifier::new(-1.0).is_ok());
        assert!(DuplicateClassifier::new(1.0).is_ok());
    }

    #[test]
    fn classify_propagates_precondition_errors() {
        let classifier = DuplicateClassifier::default();
        assert!(matches!(
            classifier.classify(&[1.0], &[1.0, 2.0]),
            Err(MatchError::DimensionMismatch { .. })
        ));
    }
}
