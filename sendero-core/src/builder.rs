//! Builder for fully configured [`Subgraph`] instances.
//!
//! Collects features, labels, metric selection, an optional precomputed
//! matrix, and the density kernel parameter, then validates them all at once
//! in [`SubgraphBuilder::build`].

use std::sync::Arc;

use crate::{
    Result,
    metric::{ArcWeight, Metric},
    subgraph::Subgraph,
};

/// Configures and constructs [`Subgraph`] instances.
///
/// # Examples
/// ```
/// use sendero_core::{Metric, SubgraphBuilder};
///
/// let graph = SubgraphBuilder::new(2)
///     .with_name("toy")
///     .with_features(vec![0.0, 0.0, 3.0, 4.0], 2)
///     .with_labels(vec![1, 2])
///     .with_metric(Metric::Manhattan)
///     .build()
///     .expect("builder configuration is valid");
///
/// assert_eq!(graph.name(), "toy");
/// assert_eq!(graph.distance(0, 1)?, 7.0);
/// assert_eq!(graph.label_count(), 2);
/// # Ok::<(), sendero_core::SubgraphError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SubgraphBuilder {
    node_n: usize,
    name: Option<Arc<str>>,
    features: Option<(Vec<f32>, usize)>,
    labels: Option<Vec<u32>>,
    metric: Metric,
    arc_weight: Option<ArcWeight>,
    distances: Option<Vec<f32>>,
    df: Option<f32>,
}

impl SubgraphBuilder {
    /// Starts a builder for `node_n` nodes using the Euclidean metric.
    #[must_use]
    pub fn new(node_n: usize) -> Self {
        Self {
            node_n,
            name: None,
            features: None,
            labels: None,
            metric: Metric::Euclidean,
            arc_weight: None,
            distances: None,
            df: None,
        }
    }

    /// Name reported in tracing spans of the built subgraph.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Row-major feature block of `node_n` rows and `feat_n` columns.
    #[must_use]
    pub fn with_features(mut self, features: Vec<f32>, feat_n: usize) -> Self {
        self.features = Some((features, feat_n));
        self
    }

    /// Ground-truth label per node.
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<u32>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Named metric used when no explicit arc weight is supplied.
    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Explicit distance function; takes precedence over the named metric.
    #[must_use]
    pub fn with_arc_weight(mut self, arc_weight: ArcWeight) -> Self {
        self.arc_weight = Some(arc_weight);
        self
    }

    /// Precomputed `node_n × node_n` distance matrix.
    #[must_use]
    pub fn with_precomputed_distances(mut self, matrix: Vec<f32>) -> Self {
        self.distances = Some(matrix);
        self
    }

    /// Degrees of freedom for density evaluation.
    #[must_use]
    pub fn with_degrees_of_freedom(mut self, df: f32) -> Self {
        self.df = Some(df);
        self
    }

    /// Number of nodes the subgraph will hold.
    #[must_use]
    pub fn node_n(&self) -> usize {
        self.node_n
    }

    /// Named metric currently selected.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Validates the configuration and constructs the subgraph.
    ///
    /// # Errors
    /// Returns the first error raised by [`Subgraph::new`],
    /// [`Subgraph::set_features`], [`Subgraph::set_true_labels`],
    /// [`Subgraph::set_precomputed_distances`], or
    /// [`Subgraph::set_degrees_of_freedom`].
    pub fn build(self) -> Result<Subgraph> {
        let mut graph = Subgraph::new(self.node_n)?;
        if let Some(name) = self.name {
            graph = graph.with_name(name);
        }

        match (&self.features, &self.labels) {
            (Some((features, feat_n)), labels) => {
                graph.set_features(features, labels.as_deref(), *feat_n)?;
            }
            (None, Some(labels)) => graph.set_true_labels(labels)?,
            (None, None) => {}
        }
        if let Some(matrix) = &self.distances {
            graph.set_precomputed_distances(matrix, None)?;
        }
        graph.set_metric(self.arc_weight, self.metric);
        if let Some(df) = self.df {
            graph.set_degrees_of_freedom(df)?;
        }
        Ok(graph)
    }
}
