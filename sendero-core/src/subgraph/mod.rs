//! The subgraph container: nodes, feature block, distance resolution.
//!
//! A [`Subgraph`] owns three caches that must stay mutually consistent: the
//! node records, a contiguous row-major feature block, and an optional
//! precomputed distance matrix keyed by node position. Feature views are
//! derived from the block on every access, so no view can outlive a
//! reallocation.

mod dataset;
mod density;
mod matrix;
mod resize;
mod transfer;

use std::sync::Arc;

use tracing::{debug, instrument};

pub use self::density::{DENS_MAX, DensityStats};
use self::matrix::DistanceMatrix;
use crate::{
    adjacency::AdjacencySet,
    error::{Result, SubgraphError},
    metric::{ArcWeight, Metric},
    node::Node,
    telemetry,
};

const DEFAULT_NAME: &str = "subgraph";

/// Dataset container consumed by neighbourhood builders and forest algorithms.
///
/// # Examples
/// ```
/// use sendero_core::{Metric, Subgraph};
///
/// let mut graph = Subgraph::new(3)?;
/// graph.set_features(&[0.0, 1.0, 10.0], Some(&[0, 0, 1]), 1)?;
/// graph.set_metric(None, Metric::Euclidean);
///
/// assert_eq!(graph.features(2)?, &[10.0]);
/// assert_eq!(graph.node(2)?.label_true(), Some(1));
/// assert_eq!(graph.distance(0, 2)?, 100.0);
/// # Ok::<(), sendero_core::SubgraphError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Subgraph {
    name: Arc<str>,
    nodes: Vec<Node>,
    ordered: Vec<usize>,
    feat_n: usize,
    features: Option<Vec<f32>>,
    matrix: Option<DistanceMatrix>,
    arc_weight: Option<ArcWeight>,
    df: Option<f32>,
    density_stats: Option<DensityStats>,
    destroyed: bool,
}

impl Subgraph {
    /// Allocates `node_n` cleared nodes whose positions follow creation order.
    ///
    /// No feature block, distance matrix, or metric is attached yet, and the
    /// ordered view starts as `0..node_n`.
    ///
    /// # Errors
    /// Returns [`SubgraphError::Allocation`] when the node array or ordered
    /// view cannot be allocated.
    #[instrument(name = "subgraph.create", err, level = "debug")]
    pub fn new(node_n: usize) -> Result<Self> {
        let mut nodes = try_with_capacity("node array", node_n)?;
        nodes.extend((0..node_n).map(Node::cleared));
        let mut ordered = try_with_capacity("ordered node list", node_n)?;
        ordered.extend(0..node_n);

        Ok(Self {
            name: Arc::from(DEFAULT_NAME),
            nodes,
            ordered,
            feat_n: 0,
            features: None,
            matrix: None,
            arc_weight: None,
            df: None,
            density_stats: None,
            destroyed: false,
        })
    }

    /// Renames the subgraph; the name appears in tracing spans.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Name reported as `data_source` in tracing spans.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_n(&self) -> usize {
        self.nodes.len()
    }

    /// Dimension of every feature vector; zero until features are attached.
    #[must_use]
    pub fn feat_n(&self) -> usize {
        self.feat_n
    }

    /// Returns whether the subgraph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node records in slot order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutable access to every node record. Node positions may be edited
    /// through this view; feature rows stay bound to slots.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Borrows one node.
    ///
    /// # Errors
    /// Returns [`SubgraphError::NodeOutOfBounds`] for an invalid index.
    pub fn node(&self, index: usize) -> Result<&Node> {
        let len = self.nodes.len();
        self.nodes
            .get(index)
            .ok_or(SubgraphError::NodeOutOfBounds { index, len })
    }

    /// Mutably borrows one node.
    ///
    /// # Errors
    /// Returns [`SubgraphError::NodeOutOfBounds`] for an invalid index.
    pub fn node_mut(&mut self, index: usize) -> Result<&mut Node> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(index)
            .ok_or(SubgraphError::NodeOutOfBounds { index, len })
    }

    /// Borrows the adjacency set of one node.
    ///
    /// # Errors
    /// Returns [`SubgraphError::NodeOutOfBounds`] for an invalid index.
    pub fn adjacency(&self, index: usize) -> Result<&AdjacencySet> {
        self.node(index).map(Node::adjacency)
    }

    /// Mutably borrows the adjacency set of one node.
    ///
    /// # Errors
    /// Returns [`SubgraphError::NodeOutOfBounds`] for an invalid index.
    pub fn adjacency_mut(&mut self, index: usize) -> Result<&mut AdjacencySet> {
        self.node_mut(index).map(Node::adjacency_mut)
    }

    /// Appends `to` to the adjacency set of `from`.
    ///
    /// # Errors
    /// Returns [`SubgraphError::NodeOutOfBounds`] when either endpoint is
    /// outside the subgraph.
    pub fn add_arc(&mut self, from: usize, to: usize) -> Result<()> {
        self.node(to)?;
        self.adjacency_mut(from)?.push(to);
        Ok(())
    }

    /// Releases the adjacency set of every node.
    pub fn clear_arcs(&mut self) {
        for node in &mut self.nodes {
            node.adjacency_mut().clear();
        }
    }

    /// Auxiliary sortable view of node identifiers.
    #[must_use]
    pub fn ordered_nodes(&self) -> &[usize] {
        &self.ordered
    }

    /// Mutable ordered view, for callers that sort nodes themselves.
    pub fn ordered_nodes_mut(&mut self) -> &mut [usize] {
        &mut self.ordered
    }

    /// Returns the feature vector of one node.
    ///
    /// # Errors
    /// Returns [`SubgraphError::NodeOutOfBounds`] for an invalid index and
    /// [`SubgraphError::FeaturesUnset`] when no block is attached.
    pub fn features(&self, index: usize) -> Result<&[f32]> {
        self.node(index)?;
        let block = self.features.as_deref().ok_or(SubgraphError::FeaturesUnset)?;
        let start = index * self.feat_n;
        block
            .get(start..start + self.feat_n)
            .ok_or(SubgraphError::NodeOutOfBounds {
                index,
                len: self.nodes.len(),
            })
    }

    /// The whole row-major feature block, if attached.
    #[must_use]
    pub fn feature_block(&self) -> Option<&[f32]> {
        self.features.as_deref()
    }

    /// Attaches a feature block, replacing any previous one.
    ///
    /// `features` holds `node_n` rows of `feat_n` values in node order. When
    /// `labels` is given, entry `i` becomes the ground-truth label of node
    /// `i`.
    ///
    /// # Errors
    /// - [`SubgraphError::Destroyed`] after [`Subgraph::destroy`].
    /// - [`SubgraphError::ZeroDimension`] when `feat_n` is zero.
    /// - [`SubgraphError::FeatureLengthMismatch`] when `features` is not
    ///   `node_n * feat_n` long.
    /// - [`SubgraphError::LabelLengthMismatch`] when `labels` is not `node_n`
    ///   long.
    /// - [`SubgraphError::Allocation`] when the block cannot be allocated.
    ///
    /// The subgraph is unchanged on error.
    #[instrument(
        name = "subgraph.set_features",
        err,
        skip_all,
        fields(
            data_source = %self.name,
            nodes = self.nodes.len(),
            feat_n = feat_n,
            labelled = labels.is_some(),
        ),
    )]
    pub fn set_features(
        &mut self,
        features: &[f32],
        labels: Option<&[u32]>,
        feat_n: usize,
    ) -> Result<()> {
        self.ensure_live()?;
        if feat_n == 0 {
            return Err(SubgraphError::ZeroDimension);
        }
        let expected = checked_area("feature block", self.nodes.len(), feat_n)?;
        if features.len() != expected {
            return Err(SubgraphError::FeatureLengthMismatch {
                expected,
                got: features.len(),
            });
        }
        self.validate_labels(labels)?;

        let mut block = try_with_capacity("feature block", expected)?;
        block.extend_from_slice(features);

        self.feat_n = feat_n;
        self.features = Some(block);
        self.assign_true_labels(labels);
        Ok(())
    }

    /// Overwrites the feature row of one node, e.g. after a growing resize.
    ///
    /// # Errors
    /// Returns [`SubgraphError::Destroyed`] after [`Subgraph::destroy`],
    /// [`SubgraphError::NodeOutOfBounds`], [`SubgraphError::FeaturesUnset`],
    /// or [`SubgraphError::FeatureDimensionMismatch`] when `row` is not
    /// `feat_n` long.
    pub fn set_node_features(&mut self, index: usize, row: &[f32]) -> Result<()> {
        self.ensure_live()?;
        self.node(index)?;
        let feat_n = self.feat_n;
        let block = self.features.as_mut().ok_or(SubgraphError::FeaturesUnset)?;
        if row.len() != feat_n {
            return Err(SubgraphError::FeatureDimensionMismatch {
                left: feat_n,
                right: row.len(),
            });
        }
        let start = index * feat_n;
        if let Some(target) = block.get_mut(start..start + feat_n) {
            target.copy_from_slice(row);
        }
        Ok(())
    }

    /// Assigns ground-truth labels to every node.
    ///
    /// # Errors
    /// Returns [`SubgraphError::Destroyed`] after [`Subgraph::destroy`] and
    /// [`SubgraphError::LabelLengthMismatch`] when `labels` is not `node_n`
    /// long.
    pub fn set_true_labels(&mut self, labels: &[u32]) -> Result<()> {
        self.ensure_live()?;
        self.validate_labels(Some(labels))?;
        self.assign_true_labels(Some(labels));
        Ok(())
    }

    /// Selects the distance function used when no matrix is attached.
    ///
    /// An explicit function always wins. Otherwise the named metric is
    /// resolved from the catalogue; [`Metric::NoMetric`] leaves the subgraph
    /// without a metric so only a precomputed matrix can answer distance
    /// queries. A destroyed subgraph keeps no metric, so the call is ignored.
    pub fn set_metric(&mut self, explicit: Option<ArcWeight>, metric: Metric) {
        if self.destroyed {
            debug!(data_source = %self.name, "metric selection ignored on destroyed subgraph");
            return;
        }
        let selection = explicit.or_else(|| metric.kernel().map(|_| ArcWeight::Named(metric)));
        debug!(data_source = %self.name, arc_weight = ?selection, "arc weight selected");
        self.arc_weight = selection;
    }

    /// The currently selected distance function.
    #[must_use]
    pub fn arc_weight(&self) -> Option<&ArcWeight> {
        self.arc_weight.as_ref()
    }

    /// Attaches a precomputed `node_n × node_n` distance matrix.
    ///
    /// From this point every distance query reads the matrix, keyed by node
    /// position, with a row stride of `node_n`.
    ///
    /// # Errors
    /// - [`SubgraphError::Destroyed`] after [`Subgraph::destroy`].
    /// - [`SubgraphError::MatrixLengthMismatch`] when `matrix` is not
    ///   `node_n²` long.
    /// - [`SubgraphError::LabelLengthMismatch`] for a mis-sized label slice.
    /// - [`SubgraphError::Allocation`] when the matrix cannot be allocated.
    #[instrument(
        name = "subgraph.set_precomputed_distances",
        err,
        skip_all,
        fields(data_source = %self.name, nodes = self.nodes.len(), labelled = labels.is_some()),
    )]
    pub fn set_precomputed_distances(
        &mut self,
        matrix: &[f32],
        labels: Option<&[u32]>,
    ) -> Result<()> {
        self.ensure_live()?;
        let stride = self.nodes.len();
        let expected = checked_area("distance matrix", stride, stride)?;
        if matrix.len() != expected {
            return Err(SubgraphError::MatrixLengthMismatch {
                expected,
                got: matrix.len(),
            });
        }
        self.validate_labels(labels)?;

        let mut values = try_with_capacity("distance matrix", expected)?;
        values.extend_from_slice(matrix);

        self.matrix = Some(DistanceMatrix::new(values, stride));
        self.assign_true_labels(labels);
        Ok(())
    }

    /// Returns whether distance queries are answered from a matrix.
    #[must_use]
    pub fn has_distance_matrix(&self) -> bool {
        self.matrix.is_some()
    }

    /// The precomputed matrix, row-major.
    #[must_use]
    pub fn distance_matrix(&self) -> Option<&[f32]> {
        self.matrix.as_ref().map(DistanceMatrix::values)
    }

    /// Row stride of the precomputed matrix.
    #[must_use]
    pub fn distance_stride(&self) -> Option<usize> {
        self.matrix.as_ref().map(DistanceMatrix::stride)
    }

    /// Resolves the distance between two nodes.
    ///
    /// With a matrix attached the entry at the nodes' positions is returned;
    /// otherwise the selected metric runs on the two feature vectors. Every
    /// consumer must go through this method so the whole pipeline shares one
    /// distance definition.
    ///
    /// # Errors
    /// - [`SubgraphError::NodeOutOfBounds`] for an invalid index.
    /// - [`SubgraphError::PositionOutsideMatrix`] when a position does not
    ///   address the matrix.
    /// - [`SubgraphError::NoDistanceFunction`] without matrix or metric.
    /// - [`SubgraphError::FeaturesUnset`] when the metric has no features.
    /// - [`SubgraphError::NonFiniteDistance`] when the result is NaN, which
    ///   includes matrix entries invalidated by a resize. Infinite distances
    ///   are returned as-is.
    pub fn distance(&self, left: usize, right: usize) -> Result<f32> {
        let value = match &self.matrix {
            Some(matrix) => {
                let row = self.node(left)?.position();
                let col = self.node(right)?.position();
                telemetry::record_matrix_lookup();
                matrix.lookup(row, col)?
            }
            None => self.metric_distance(left, right)?,
        };

        if value.is_nan() {
            Err(SubgraphError::NonFiniteDistance { left, right })
        } else {
            Ok(value)
        }
    }

    fn metric_distance(&self, left: usize, right: usize) -> Result<f32> {
        self.node(left)?;
        self.node(right)?;
        let weight = self
            .arc_weight
            .as_ref()
            .ok_or(SubgraphError::NoDistanceFunction)?;
        let left_features = self.features(left)?;
        let right_features = self.features(right)?;
        telemetry::record_metric_evaluation();
        Ok(weight.evaluate(left_features, right_features))
    }

    /// Recomputes the distance matrix from the selected metric.
    ///
    /// The new matrix is keyed by slot, so every node's position is reset to
    /// its slot index. NaN metric results are stored as-is and
    /// reported by [`Subgraph::distance`].
    ///
    /// # Errors
    /// Returns [`SubgraphError::NoDistanceFunction`] without a metric,
    /// [`SubgraphError::FeaturesUnset`] without features, and
    /// [`SubgraphError::Allocation`] when the matrix cannot be allocated.
    #[instrument(
        name = "subgraph.refresh_distance_matrix",
        err,
        skip(self),
        fields(data_source = %self.name, nodes = self.nodes.len()),
    )]
    pub fn refresh_distance_matrix(&mut self) -> Result<()> {
        self.ensure_live()?;
        let stride = self.nodes.len();
        let expected = checked_area("distance matrix", stride, stride)?;
        let mut values = try_with_capacity("distance matrix", expected)?;
        if self.arc_weight.is_none() {
            return Err(SubgraphError::NoDistanceFunction);
        }
        if self.features.is_none() {
            return Err(SubgraphError::FeaturesUnset);
        }
        for row in 0..stride {
            for col in 0..stride {
                values.push(self.metric_distance(row, col)?);
            }
        }

        self.matrix = Some(DistanceMatrix::new(values, stride));
        self.reset_positions();
        Ok(())
    }

    /// Detaches the precomputed matrix so the metric answers queries again.
    pub fn clear_distance_matrix(&mut self) {
        self.matrix = None;
    }

    /// Releases every owned resource and marks the subgraph destroyed.
    ///
    /// Resources go in order: feature block, distance matrix, adjacency
    /// sets, nodes, ordered view. Calling this again is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.features = None;
        self.matrix = None;
        self.clear_arcs();
        self.nodes = Vec::new();
        self.ordered = Vec::new();
        self.feat_n = 0;
        self.arc_weight = None;
        self.df = None;
        self.density_stats = None;
        self.destroyed = true;
        debug!(data_source = %self.name, "subgraph destroyed");
    }

    /// Returns whether [`Subgraph::destroy`] has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn ensure_live(&self) -> Result<()> {
        if self.destroyed {
            Err(SubgraphError::Destroyed)
        } else {
            Ok(())
        }
    }

    fn validate_labels(&self, labels: Option<&[u32]>) -> Result<()> {
        match labels {
            Some(labels) if labels.len() != self.nodes.len() => {
                Err(SubgraphError::LabelLengthMismatch {
                    expected: self.nodes.len(),
                    got: labels.len(),
                })
            }
            _ => Ok(()),
        }
    }

    fn assign_true_labels(&mut self, labels: Option<&[u32]>) {
        if let Some(labels) = labels {
            for (node, &label) in self.nodes.iter_mut().zip(labels) {
                node.set_label_true(Some(label));
            }
        }
    }
}

/// Allocates an empty buffer able to hold `len` elements without panicking
/// on exhaustion.
pub(crate) fn try_with_capacity<T>(what: &'static str, len: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| SubgraphError::Allocation {
            what,
            requested: len,
        })?;
    Ok(buffer)
}

/// `rows * cols`, reported as an allocation failure on overflow.
pub(crate) fn checked_area(what: &'static str, rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or(SubgraphError::Allocation {
        what,
        requested: usize::MAX,
    })
}
