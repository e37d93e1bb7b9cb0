//! Shared helpers for metric implementations.

use super::types::{DistanceError, Result, Vector};

/// Ensures both vectors share the same dimensionality.
pub(crate) fn validate_dimensions(left: &Vector<'_>, right: &Vector<'_>) -> Result<()> {
    if left.dimension() != right.dimension() {
        return Err(DistanceError::DimensionMismatch {
            left: left.dimension(),
            right: right.dimension(),
        });
    }
    Ok(())
}

/// Sums `term(l, r)` over paired components, skipping pairs whose term is
/// undefined (`None`).
pub(crate) fn sum_terms(
    left: &[f32],
    right: &[f32],
    term: impl Fn(f64, f64) -> Option<f64>,
) -> f64 {
    left.iter()
        .zip(right.iter())
        .filter_map(|(&l, &r)| term(f64::from(l), f64::from(r)))
        .sum()
}

/// Sum of squared component differences.
pub(crate) fn squared_l2(left: &[f32], right: &[f32]) -> f64 {
    sum_terms(left, right, |l, r| {
        let diff = l - r;
        Some(diff * diff)
    })
}
