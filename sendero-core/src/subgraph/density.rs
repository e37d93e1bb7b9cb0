//! Gaussian kernel density over each node's adjacency.

use tracing::{debug, instrument};

use super::{Subgraph, try_with_capacity};
use crate::{
    error::{Result, SubgraphError},
    telemetry,
};

/// Upper bound of the rescaled density range `[1, DENS_MAX]`.
pub const DENS_MAX: f32 = 1000.0;

/// Summary of the last successful density evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DensityStats {
    bandwidth: f32,
    min: f32,
    max: f32,
}

impl DensityStats {
    /// Kernel bandwidth `k = 2·df / 9`.
    #[must_use]
    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }

    /// Smallest raw density before rescaling.
    #[must_use]
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Largest raw density before rescaling.
    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// All raw densities were equal, so every node was assigned `DENS_MAX`.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

impl Subgraph {
    /// Sets the kernel degrees of freedom used by [`Subgraph::evaluate_density`].
    ///
    /// # Errors
    /// Returns [`SubgraphError::Destroyed`] after [`Subgraph::destroy`] and
    /// [`SubgraphError::InvalidDegreesOfFreedom`] unless `df` is finite and
    /// strictly positive.
    pub fn set_degrees_of_freedom(&mut self, df: f32) -> Result<()> {
        self.ensure_live()?;
        if !(df.is_finite() && df > 0.0) {
            return Err(SubgraphError::InvalidDegreesOfFreedom { got: df });
        }
        self.df = Some(df);
        Ok(())
    }

    /// Kernel degrees of freedom, once set.
    #[must_use]
    pub fn degrees_of_freedom(&self) -> Option<f32> {
        self.df
    }

    /// Statistics of the last density evaluation, if any.
    #[must_use]
    pub fn density_stats(&self) -> Option<DensityStats> {
        self.density_stats
    }

    /// Computes a rescaled Gaussian density for every node.
    ///
    /// The raw density of node `i` with adjacency `A(i)` is
    /// `Σ_{j∈A(i)} exp(-d(i, j) / k) / (|A(i)| + 1)` with `k = 2·df / 9`.
    /// Raw values are mapped linearly onto `[1, DENS_MAX]` and each node's
    /// path value becomes `density - 1`. When every raw value is equal the
    /// nodes get `DENS_MAX` and `DENS_MAX - 1` instead. An empty subgraph is
    /// a no-op.
    ///
    /// # Errors
    /// - [`SubgraphError::DegreesOfFreedomUnset`] without a prior
    ///   [`Subgraph::set_degrees_of_freedom`].
    /// - Any error from [`Subgraph::distance`] for an arc, including
    ///   [`SubgraphError::NodeOutOfBounds`] for an arc to a removed node.
    /// - [`SubgraphError::Allocation`] when the scratch buffer cannot be
    ///   allocated.
    ///
    /// Nodes are left untouched on error.
    #[instrument(
        name = "subgraph.evaluate_density",
        err,
        skip(self),
        fields(data_source = %self.name, nodes = self.nodes.len()),
    )]
    pub fn evaluate_density(&mut self) -> Result<()> {
        let df = self.df.ok_or(SubgraphError::DegreesOfFreedomUnset)?;
        if self.nodes.is_empty() {
            return Ok(());
        }
        let bandwidth = 2.0 * f64::from(df) / 9.0;
        let raw = self.raw_densities(bandwidth)?;
        let (min, max) = extrema(&raw);

        if min == max {
            debug!(raw = min, "all raw densities equal; assigning the maximum");
            for node in &mut self.nodes {
                node.set_density(DENS_MAX);
                node.set_path_value(DENS_MAX - 1.0);
            }
        } else {
            let span = max - min;
            let scale = f64::from(DENS_MAX - 1.0);
            for (node, value) in self.nodes.iter_mut().zip(&raw) {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "rescaled densities lie in [1, DENS_MAX]"
                )]
                let density = (scale * ((value - min) / span) + 1.0) as f32;
                node.set_density(density);
                node.set_path_value(density - 1.0);
            }
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "statistics are reported at feature precision"
        )]
        let stats = DensityStats {
            bandwidth: bandwidth as f32,
            min: min as f32,
            max: max as f32,
        };
        self.density_stats = Some(stats);
        telemetry::record_density_evaluation();
        Ok(())
    }

    fn raw_densities(&self, bandwidth: f64) -> Result<Vec<f64>> {
        let mut raw = try_with_capacity("density buffer", self.nodes.len())?;
        for (index, node) in self.nodes.iter().enumerate() {
            let mut sum = 0.0_f64;
            for neighbour in node.adjacency() {
                let distance = f64::from(self.distance(index, neighbour)?);
                sum += (-distance / bandwidth).exp();
            }
            #[expect(
                clippy::cast_precision_loss,
                reason = "adjacency sizes are far below 2^52"
            )]
            let normaliser = (node.adjacency().len() + 1) as f64;
            raw.push(sum / normaliser);
        }
        Ok(raw)
    }
}

/// Minimum and maximum of a non-empty slice. Starts from the infinities so a
/// subgraph of isolated nodes (all zeros) is reported as degenerate.
fn extrema(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &value| {
            (min.min(value), max.max(value))
        })
}
