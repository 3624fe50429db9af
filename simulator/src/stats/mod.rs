//! Descriptive statistics helpers.
//!
//! Small, pure functions over f64 slices used by the calibrator's
//! convergence check and the result-table reporting. The `*_sorted`
//! variants expect their input sorted ascending and do not verify it.

/// Calculate the mean of a slice of values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Upper median of an ascending-sorted slice (`sorted[len / 2]`).
///
/// The upper median matches the calibrator's convergence check, which takes
/// the element at `len / 2` rather than averaging the middle pair.
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    Some(sorted[sorted.len() / 2])
}

/// Nearest-rank percentile of an ascending-sorted slice.
///
/// `p` is in percent, e.g. `95.0`. The rank is `round(p / 100 * (n - 1))`.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let index = ((p / 100.0) * (sorted.len() as f64 - 1.0)).round() as usize;
    Some(sorted[index.min(sorted.len() - 1)])
}
