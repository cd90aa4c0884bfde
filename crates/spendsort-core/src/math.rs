//! Numeric helpers shared by the scoring pipeline

/// Divide `numerator` by `denominator`, returning `fallback` when the
/// denominator is zero or the quotient is not finite.
///
/// Every ratio in the categorizer (term frequency, idf, confidences, seasonal
/// normalization) goes through here so that NaN/Infinity never leak into
/// scores.
pub fn safe_divide(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator == 0.0 {
        return fallback;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Dot product over the overlapping prefix of two vectors
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Share of the positive score mass held by `score`, in `[0, 1]`
pub fn normalized_share<I>(score: f64, scores: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let total: f64 = scores.into_iter().map(|s| s.max(0.0)).sum();
    if total > 0.0 {
        Some(safe_divide(score.max(0.0), total, 0.0).min(1.0))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_divide_zero_denominator() {
        assert_eq!(safe_divide(3.0, 0.0, 0.0), 0.0);
        assert_eq!(safe_divide(3.0, 0.0, 1.5), 1.5);
    }

    #[test]
    fn test_safe_divide_regular() {
        assert_eq!(safe_divide(1.0, 4.0, 0.0), 0.25);
    }

    #[test]
    fn test_safe_divide_non_finite() {
        assert_eq!(safe_divide(f64::INFINITY, 2.0, 0.0), 0.0);
        assert_eq!(safe_divide(f64::NAN, 2.0, 0.0), 0.0);
    }

    #[test]
    fn test_dot_uses_shorter_length() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0]), 14.0);
        assert_eq!(dot(&[], &[1.0]), 0.0);
    }

    #[test]
    fn test_normalized_share() {
        assert_eq!(normalized_share(2.0, [2.0, 2.0, -1.0]), Some(0.5));
        assert_eq!(normalized_share(0.0, [0.0, -3.0]), None);
        assert_eq!(normalized_share(-1.0, [1.0, -1.0]), Some(0.0));
    }
}
