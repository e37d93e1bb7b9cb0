//! Growing and shrinking a subgraph in place.

use tracing::{debug, instrument, warn};

use super::{Subgraph, checked_area, matrix::DistanceMatrix, try_with_capacity};
use crate::{
    error::{Result, SubgraphError},
    node::Node,
};

impl Subgraph {
    /// Changes the node count to `node_n`.
    ///
    /// Surviving nodes keep every field, adjacency included. Appended nodes
    /// are cleared with `position = slot`, and their feature rows are NaN
    /// until [`Subgraph::set_node_features`] fills them. The ordered view
    /// drops removed identifiers and appends new ones.
    ///
    /// With a distance matrix attached, a new slot-keyed matrix of stride
    /// `node_n` is built: entries between surviving nodes are copied from the
    /// old matrix and every entry touching an appended node is NaN, which
    /// [`Subgraph::distance`] reports as [`SubgraphError::NonFiniteDistance`]
    /// until [`Subgraph::refresh_distance_matrix`] runs. Surviving positions
    /// are re-keyed to their slots so they keep addressing the matrix.
    ///
    /// Arcs pointing at removed nodes are left in place.
    ///
    /// # Errors
    /// Returns [`SubgraphError::Destroyed`] after [`Subgraph::destroy`] and
    /// [`SubgraphError::Allocation`] when any buffer cannot grow. The
    /// subgraph is unchanged on error.
    #[instrument(
        name = "subgraph.resize",
        err,
        skip(self),
        fields(data_source = %self.name, from = self.nodes.len()),
    )]
    pub fn resize(&mut self, node_n: usize) -> Result<()> {
        self.ensure_live()?;
        let old_n = self.nodes.len();
        if node_n == old_n {
            return Ok(());
        }

        let rebuilt = self
            .matrix
            .as_ref()
            .map(|matrix| self.rebuild_matrix(matrix, node_n))
            .transpose()?;
        let feature_len = checked_area("feature block", node_n, self.feat_n)?;
        let grow = node_n.saturating_sub(old_n);
        reserve(&mut self.nodes, grow, "node array", node_n)?;
        reserve(&mut self.ordered, grow, "ordered node list", node_n)?;
        if let Some(block) = &mut self.features {
            let extra = feature_len.saturating_sub(block.len());
            reserve(block, extra, "feature block", feature_len)?;
        }

        self.nodes.truncate(node_n);
        self.nodes.extend((old_n..node_n).map(Node::cleared));
        self.ordered.retain(|&id| id < node_n);
        self.ordered.extend(old_n..node_n);
        if let Some(block) = &mut self.features {
            block.resize(feature_len, f32::NAN);
        }
        if let Some(matrix) = rebuilt {
            self.matrix = Some(matrix);
            self.reset_positions();
        }

        let dangling: usize = self
            .nodes
            .iter()
            .map(|node| node.adjacency().iter().filter(|&id| id >= node_n).count())
            .sum();
        if dangling > 0 {
            debug!(dangling, "adjacency sets still reference removed nodes");
        }
        Ok(())
    }

    fn rebuild_matrix(&self, matrix: &DistanceMatrix, node_n: usize) -> Result<DistanceMatrix> {
        let len = checked_area("distance matrix", node_n, node_n)?;
        let mut values = try_with_capacity("distance matrix", len)?;
        let mut missing = 0_usize;
        for row in 0..node_n {
            for col in 0..node_n {
                let value = self
                    .nodes
                    .get(row)
                    .zip(self.nodes.get(col))
                    .and_then(|(left, right)| matrix.get(left.position(), right.position()))
                    .unwrap_or(f32::NAN);
                if value.is_nan() {
                    missing += 1;
                }
                values.push(value);
            }
        }
        if missing > 0 {
            warn!(
                missing,
                stride = node_n,
                "resized distance matrix has entries without a distance; refresh it once features are assigned"
            );
        }
        Ok(DistanceMatrix::new(values, node_n))
    }
}

fn reserve<T>(buffer: &mut Vec<T>, additional: usize, what: &'static str, requested: usize) -> Result<()> {
    buffer
        .try_reserve_exact(additional)
        .map_err(|_| SubgraphError::Allocation { what, requested })
}
