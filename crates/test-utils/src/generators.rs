//! Value generators for synthetic datasets.
//!
//! Patterns are chosen so a test can recompute the expected value from its
//! position alone.

/// `0, 1, 2, ..., n - 1`.
///
/// Used for multi-dimensional variables: the value at a position equals its
/// row-major offset.
///
/// ```
/// use test_utils::indexed_values;
///
/// let values = indexed_values(4);
/// assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0]);
/// ```
pub fn indexed_values(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

/// `n` values starting at `start`, `step` apart.
///
/// ```
/// use test_utils::ramp;
///
/// assert_eq!(ramp(0.0, 6.0, 3), vec![0.0, 6.0, 12.0]);
/// ```
pub fn ramp(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_values() {
        let values = indexed_values(24);
        assert_eq!(values.len(), 24);
        assert_eq!(values[23], 23.0);
    }

    #[test]
    fn test_ramp() {
        assert_eq!(ramp(10.0, 0.5, 3), vec![10.0, 10.5, 11.0]);
        assert!(ramp(1.0, 1.0, 0).is_empty());
    }
}
