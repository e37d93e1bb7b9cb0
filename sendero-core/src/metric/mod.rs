//! Pairwise feature distances ("arc weights") used by subgraphs.
//!
//! A [`Metric`] names one of the catalogued kernels. An [`ArcWeight`] is the
//! strategy a [`crate::Subgraph`] actually stores: either a named metric or a
//! caller-supplied function. Kernels are unchecked for speed; the validated
//! entry point [`Metric::distance`] rejects empty, mismatched, or non-finite
//! inputs.

mod helpers;
mod kernels;
mod types;

use std::{fmt, str::FromStr, sync::Arc};

use thiserror::Error;

use self::helpers::validate_dimensions;
pub use self::kernels::MAX_ARC_WEIGHT;
pub use self::types::{Distance, DistanceError, Result, Vector, VectorKind};

/// Signature shared by every metric kernel.
pub type MetricFn = fn(&[f32], &[f32]) -> f32;

/// Catalogue of named metrics a subgraph can select.
///
/// `NoMetric` disables metric-based distances; it is only meaningful when a
/// precomputed distance matrix is attached.
///
/// # Examples
/// ```
/// use sendero_core::Metric;
///
/// let metric: Metric = "manhattan".parse()?;
/// assert_eq!(metric, Metric::Manhattan);
/// assert_eq!(metric.to_string(), "manhattan");
/// # Ok::<(), sendero_core::MetricError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Metric {
    /// Squared Euclidean distance.
    Euclidean,
    /// `MAX_ARC_WEIGHT * ln(1 + squared Euclidean)`.
    LogEuclidean,
    /// Chi-square distance between mass-normalised vectors.
    ChiSquare,
    /// Squared chi-square distance.
    SquaredChiSquare,
    /// L1 distance.
    Manhattan,
    /// Canberra distance.
    Canberra,
    /// Squared chord distance.
    SquaredChord,
    /// Bray-Curtis dissimilarity.
    BrayCurtis,
    /// No metric; distances come from a precomputed matrix.
    NoMetric,
}

impl Metric {
    /// Every catalogued selection, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Euclidean,
        Self::LogEuclidean,
        Self::ChiSquare,
        Self::SquaredChiSquare,
        Self::Manhattan,
        Self::Canberra,
        Self::SquaredChord,
        Self::BrayCurtis,
        Self::NoMetric,
    ];

    /// Returns the stable textual name of the selection.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::LogEuclidean => "log-euclidean",
            Self::ChiSquare => "chi-square",
            Self::SquaredChiSquare => "squared-chi-square",
            Self::Manhattan => "manhattan",
            Self::Canberra => "canberra",
            Self::SquaredChord => "squared-chord",
            Self::BrayCurtis => "bray-curtis",
            Self::NoMetric => "none",
        }
    }

    /// Returns the unchecked kernel, or `None` for [`Metric::NoMetric`].
    #[must_use]
    pub fn kernel(self) -> Option<MetricFn> {
        let kernel: MetricFn = match self {
            Self::Euclidean => kernels::euclidean,
            Self::LogEuclidean => kernels::log_euclidean,
            Self::ChiSquare => kernels::chi_square,
            Self::SquaredChiSquare => kernels::squared_chi_square,
            Self::Manhattan => kernels::manhattan,
            Self::Canberra => kernels::canberra,
            Self::SquaredChord => kernels::squared_chord,
            Self::BrayCurtis => kernels::bray_curtis,
            Self::NoMetric => return None,
        };
        Some(kernel)
    }

    /// Computes the distance between two vectors after validating them.
    ///
    /// # Examples
    ///
    /// ```
    /// use sendero_core::{DistanceError, Metric};
    ///
    /// fn main() -> Result<(), DistanceError> {
    ///     let distance = Metric::Euclidean.distance(&[1.0, 2.0], &[4.0, 6.0])?;
    ///     assert!((distance.value() - 25.0).abs() < 1e-6);
    ///     Ok(())
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// - [`DistanceError::ZeroLength`] when any input is empty.
    /// - [`DistanceError::DimensionMismatch`] when input lengths differ.
    /// - [`DistanceError::NonFinite`] when a value is NaN or infinite.
    /// - [`DistanceError::Undefined`] for [`Metric::NoMetric`].
    pub fn distance(self, left: &[f32], right: &[f32]) -> Result<Distance> {
        let kernel = self.kernel().ok_or(DistanceError::Undefined)?;
        let left = Vector::new(left, VectorKind::Left)?;
        let right = Vector::new(right, VectorKind::Right)?;
        validate_dimensions(&left, &right)?;
        Ok(Distance::from_raw(kernel(&left, &right)))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error raised when a metric is selected by an unrecognised name.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MetricError {
    /// The name does not match any catalogued metric.
    #[error("unknown metric `{name}`")]
    Unknown {
        /// The rejected name.
        name: String,
    },
}

impl FromStr for Metric {
    type Err = MetricError;

    fn from_str(raw: &str) -> core::result::Result<Self, Self::Err> {
        let normalised = raw.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|metric| metric.name() == normalised)
            .ok_or_else(|| MetricError::Unknown {
                name: raw.to_owned(),
            })
    }
}

/// Caller-supplied distance function.
pub type CustomArcWeight = Arc<dyn Fn(&[f32], &[f32]) -> f32 + Send + Sync>;

/// Distance strategy stored by a subgraph.
///
/// # Examples
/// ```
/// use sendero_core::{ArcWeight, Metric};
///
/// let named = ArcWeight::Named(Metric::Manhattan);
/// assert_eq!(named.evaluate(&[0.0, 0.0], &[1.0, 2.0]), 3.0);
///
/// let chebyshev = ArcWeight::custom(|a, b| {
///     a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f32::max)
/// });
/// assert_eq!(chebyshev.evaluate(&[0.0, 0.0], &[1.0, 2.0]), 2.0);
/// assert_eq!(chebyshev.metric(), None);
/// ```
#[derive(Clone)]
pub enum ArcWeight {
    /// A catalogued metric other than [`Metric::NoMetric`].
    Named(Metric),
    /// A caller-supplied function.
    Custom(CustomArcWeight),
}

impl ArcWeight {
    /// Wraps a closure as a custom arc weight.
    pub fn custom<F>(function: F) -> Self
    where
        F: Fn(&[f32], &[f32]) -> f32 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(function))
    }

    /// Evaluates the strategy on two feature vectors without validation.
    ///
    /// `Named(Metric::NoMetric)` evaluates to NaN.
    #[must_use]
    pub fn evaluate(&self, left: &[f32], right: &[f32]) -> f32 {
        match self {
            Self::Named(metric) => metric.kernel().map_or(f32::NAN, |kernel| kernel(left, right)),
            Self::Custom(function) => function(left, right),
        }
    }

    /// Returns the named metric, if this is not a custom function.
    #[must_use]
    pub fn metric(&self) -> Option<Metric> {
        match self {
            Self::Named(metric) => Some(*metric),
            Self::Custom(_) => None,
        }
    }
}

impl fmt::Debug for ArcWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(metric) => f.debug_tuple("Named").field(metric).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// ============================================================================
// Kani Formal Verification
// ============================================================================

#[cfg(kani)]
mod kani_proofs {
    use super::Metric;

    /// Verifies that every symmetric kernel gives d(a, b) = d(b, a).
    #[kani::proof]
    #[kani::unwind(4)]
    fn verify_symmetric_kernels_2d() {
        let a: [f32; 2] = [kani::any(), kani::any()];
        let b: [f32; 2] = [kani::any(), kani::any()];
        for &v in a.iter().chain(b.iter()) {
            kani::assume(v.is_finite() && v.abs() < 1.0e6);
        }

        for metric in [Metric::Euclidean, Metric::Manhattan, Metric::Canberra] {
            if let (Ok(ab), Ok(ba)) = (metric.distance(&a, &b), metric.distance(&b, &a)) {
                kani::assert(ab.value() == ba.value(), "metric symmetry violated");
            }
        }
    }
}
