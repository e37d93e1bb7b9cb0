//! Unchecked kernels backing the named metrics.
//!
//! Kernels accumulate in `f64` and narrow to `f32` on return. Components whose
//! term has a zero denominator contribute nothing. Inputs are not validated:
//! a NaN component yields a NaN distance, which [`crate::Subgraph::distance`]
//! rejects.

use super::helpers::{squared_l2, sum_terms};

/// Scale applied by the log-Euclidean metric.
pub const MAX_ARC_WEIGHT: f64 = 100_000.0;

/// Squared Euclidean distance, the conventional OPF arc weight.
#[expect(
    clippy::cast_possible_truncation,
    reason = "kernels accumulate in f64 and return at feature precision"
)]
pub(crate) fn euclidean(left: &[f32], right: &[f32]) -> f32 {
    squared_l2(left, right) as f32
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "kernels accumulate in f64 and return at feature precision"
)]
pub(crate) fn log_euclidean(left: &[f32], right: &[f32]) -> f32 {
    (MAX_ARC_WEIGHT * squared_l2(left, right).ln_1p()) as f32
}

/// Chi-square distance between the two vectors normalised to unit mass.
#[expect(
    clippy::cast_possible_truncation,
    reason = "kernels accumulate in f64 and return at feature precision"
)]
pub(crate) fn chi_square(left: &[f32], right: &[f32]) -> f32 {
    let left_mass: f64 = left.iter().map(|&v| f64::from(v)).sum();
    let right_mass: f64 = right.iter().map(|&v| f64::from(v)).sum();
    let sum = sum_terms(left, right, |l, r| {
        let denominator = l + r;
        if denominator == 0.0 {
            return None;
        }
        let diff = mass_fraction(l, left_mass) - mass_fraction(r, right_mass);
        Some(diff * diff / denominator)
    });
    sum.sqrt() as f32
}

fn mass_fraction(value: f64, mass: f64) -> f64 {
    if mass == 0.0 { 0.0 } else { value / mass }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "kernels accumulate in f64 and return at feature precision"
)]
pub(crate) fn squared_chi_square(left: &[f32], right: &[f32]) -> f32 {
    sum_terms(left, right, |l, r| {
        let denominator = (l + r).abs();
        (denominator != 0.0).then(|| (l - r) * (l - r) / denominator)
    }) as f32
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "kernels accumulate in f64 and return at feature precision"
)]
pub(crate) fn manhattan(left: &[f32], right: &[f32]) -> f32 {
    sum_terms(left, right, |l, r| Some((l - r).abs())) as f32
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "kernels accumulate in f64 and return at feature precision"
)]
pub(crate) fn canberra(left: &[f32], right: &[f32]) -> f32 {
    sum_terms(left, right, |l, r| {
        let denominator = l.abs() + r.abs();
        (denominator != 0.0).then(|| (l - r).abs() / denominator)
    }) as f32
}

/// Squared chord distance; negative components are clamped to zero before
/// taking square roots.
#[expect(
    clippy::cast_possible_truncation,
    reason = "kernels accumulate in f64 and return at feature precision"
)]
pub(crate) fn squared_chord(left: &[f32], right: &[f32]) -> f32 {
    sum_terms(left, right, |l, r| {
        let diff = l.max(0.0).sqrt() - r.max(0.0).sqrt();
        Some(diff * diff)
    }) as f32
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "kernels accumulate in f64 and return at feature precision"
)]
pub(crate) fn bray_curtis(left: &[f32], right: &[f32]) -> f32 {
    let numerator = sum_terms(left, right, |l, r| Some((l - r).abs()));
    let denominator = sum_terms(left, right, |l, r| Some(l + r));
    if denominator == 0.0 {
        0.0
    } else {
        (numerator / denominator) as f32
    }
}
