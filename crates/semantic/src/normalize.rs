use crate::SemanticError;

/// Euclidean length of `v`.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// In-place L2 normalization.
///
/// A zero or non-finite vector has no unit-length form and is reported as an
/// inference failure instead of being passed through.
pub(crate) fn l2_normalize_in_place(v: &mut [f32]) -> Result<(), SemanticError> {
    let norm_sq: f32 = v.iter().map(|x| x * x).sum();
    if !norm_sq.is_finite() || norm_sq == 0.0 {
        return Err(SemanticError::Inference(format!(
            "model produced an embedding that cannot be normalized (squared norm {norm_sq})"
        )));
    }
    let inv_norm = norm_sq.sqrt().recip();
    for x in v.iter_mut() {
        *x *= inv_norm;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_three_four_five() {
        let mut v = vec![3.0f32, 4.0];
        l2_normalize_in_place(&mut v).unwrap();
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn result_has_unit_length() {
        let mut v: Vec<f32> = (0..1024).map(|i| (i as f32 * 0.37).sin()).collect();
        l2_normalize_in_place(&mut v).unwrap();
        assert!((l2_norm(&v) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn zero_vector_is_rejected() {
        let mut v = vec![0.0f32; 4];
        assert!(matches!(
            l2_normalize_in_place(&mut v),
            Err(SemanticError::Inference(_))
        ));
    }

    #[test]
    fn non_finite_vector_is_rejected() {
        let mut nan = vec![1.0f32, f32::NAN];
        assert!(l2_normalize_in_place(&mut nan).is_err());

        let mut overflow = vec![f32::MAX, f32::MAX];
        assert!(l2_normalize_in_place(&mut overflow).is_err());
    }

    #[test]
    fn negative_components_keep_sign() {
        let mut v = vec![-3.0f32, 4.0];
        l2_normalize_in_place(&mut v).unwrap();
        assert!((v[0] + 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn idempotent() {
        let mut v = vec![1.0f32, 2.0, 3.0];
        l2_normalize_in_place(&mut v).unwrap();
        let once = v.clone();
        l2_normalize_in_place(&mut v).unwrap();
        for (a, b) in v.iter().zip(once.iter()) {
            assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        }
    }

    #[test]
    fn norm_of_empty_is_zero() {
        assert_eq!(l2_norm(&[]), 0.0);
    }
}
