//! Index-addressed distance sources.
//!
//! Neighbourhood builders and forest algorithms are written against
//! [`PairwiseDistance`] rather than [`Subgraph`] directly, so they can run on
//! any collection that resolves distances between item indices.

use crate::{
    error::{Result, SubgraphError},
    subgraph::Subgraph,
};

/// Collection of items that can yield pairwise distances.
///
/// # Examples
/// ```
/// use sendero_core::{PairwiseDistance, Result, SubgraphError};
///
/// struct Line(Vec<f32>);
///
/// impl PairwiseDistance for Line {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "line" }
///     fn distance(&self, i: usize, j: usize) -> Result<f32> {
///         let len = self.0.len();
///         let a = self.0.get(i).ok_or(SubgraphError::NodeOutOfBounds { index: i, len })?;
///         let b = self.0.get(j).ok_or(SubgraphError::NodeOutOfBounds { index: j, len })?;
///         Ok((a - b).abs())
///     }
/// }
///
/// let line = Line(vec![1.0, 2.0, 4.0]);
/// assert_eq!(line.batch_distances(0, &[1, 2])?, [1.0, 3.0]);
///
/// let mut out = [0.0; 2];
/// line.distance_batch(&[(0, 1), (1, 2)], &mut out)?;
/// assert_eq!(out, [1.0, 2.0]);
/// # Ok::<(), SubgraphError>(())
/// ```
pub trait PairwiseDistance {
    /// Number of addressable items.
    fn len(&self) -> usize;

    /// Returns whether there are no items.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable name used in tracing fields.
    fn name(&self) -> &str;

    /// Computes the distance between two items.
    ///
    /// # Errors
    /// Implementations return [`SubgraphError::NodeOutOfBounds`] for invalid
    /// indices and must not yield NaN. Infinite distances are allowed.
    fn distance(&self, i: usize, j: usize) -> Result<f32>;

    /// Computes the distances from `query` to every entry in `candidates`.
    ///
    /// # Errors
    /// Returns the first error surfaced by [`PairwiseDistance::distance`].
    fn batch_distances(&self, query: usize, candidates: &[usize]) -> Result<Vec<f32>> {
        candidates
            .iter()
            .map(|&candidate| self.distance(query, candidate))
            .collect()
    }

    /// Computes several distances at once, storing results in `out`.
    ///
    /// # Errors
    /// Returns [`SubgraphError::OutputLengthMismatch`] if
    /// `pairs.len() != out.len()`, or the first distance error.
    ///
    /// If any pair fails, `out` is left unmodified.
    fn distance_batch(&self, pairs: &[(usize, usize)], out: &mut [f32]) -> Result<()> {
        if pairs.len() != out.len() {
            return Err(SubgraphError::OutputLengthMismatch {
                out: out.len(),
                expected: pairs.len(),
            });
        }
        let staged = pairs
            .iter()
            .map(|&(i, j)| self.distance(i, j))
            .collect::<Result<Vec<_>>>()?;
        out.copy_from_slice(&staged);
        Ok(())
    }
}

impl PairwiseDistance for Subgraph {
    fn len(&self) -> usize {
        self.node_n()
    }

    fn name(&self) -> &str {
        Subgraph::name(self)
    }

    fn distance(&self, i: usize, j: usize) -> Result<f32> {
        Subgraph::distance(self, i, j)
    }
}
