//! Series helpers used to derive the forecast model from history.

/// Mean of the last `min(window, data.len())` values. Empty input yields 0.
pub fn trailing_mean(data: &[f64], window: usize) -> f64 {
    let n = window.min(data.len());
    if n == 0 {
        return 0.0;
    }
    data[data.len() - n..].iter().sum::<f64>() / n as f64
}

/// Linear trend per step: `(last - first) / len`. Fewer than two points yield 0.
pub fn linear_trend(data: &[f64]) -> f64 {
    match (data.first(), data.last()) {
        (Some(first), Some(last)) if data.len() >= 2 => (last - first) / data.len() as f64,
        _ => 0.0,
    }
}

/// Detrended leading values: element `k` is `data[k] - trend * k`.
pub fn seasonality(data: &[f64], trend: f64, length: usize) -> Vec<f64> {
    data.iter()
        .take(length)
        .enumerate()
        .map(|(k, v)| v - trend * k as f64)
        .collect()
}

/// `(min, max)` of the series, or `None` when empty.
pub fn range(data: &[f64]) -> Option<(f64, f64)> {
    if data.is_empty() {
        return None;
    }
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_mean_uses_tail() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert!((trailing_mean(&data, 2) - 3.5).abs() < 1e-12);
        // window larger than data falls back to the whole series
        assert!((trailing_mean(&data, 30) - 2.5).abs() < 1e-12);
        assert_eq!(trailing_mean(&[], 30), 0.0);
    }

    #[test]
    fn test_linear_trend() {
        assert!((linear_trend(&[100.0, 150.0, 200.0, 300.0]) - 50.0).abs() < 1e-12);
        assert_eq!(linear_trend(&[42.0]), 0.0);
        assert_eq!(linear_trend(&[]), 0.0);
    }

    #[test]
    fn test_seasonality_detrends_leading_values() {
        let s = seasonality(&[10.0, 12.0, 14.0, 99.0], 2.0, 3);
        assert_eq!(s, vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_range() {
        assert_eq!(range(&[3.0, -1.0, 7.5]), Some((-1.0, 7.5)));
        assert_eq!(range(&[]), None);
    }
}
