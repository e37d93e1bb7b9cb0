//! Copying, swapping, and snapshotting individual nodes.

use super::Subgraph;
use crate::{
    error::{Result, SubgraphError},
    node::OwnedNode,
};

impl Subgraph {
    /// Exchanges the records of two nodes together with their feature rows.
    ///
    /// Positions travel with the records, so after a swap each slot reports
    /// the identity of the content it now holds. Use
    /// [`Subgraph::reset_positions`] to re-key identities to slots.
    ///
    /// # Errors
    /// Returns [`SubgraphError::NodeOutOfBounds`] for an invalid index.
    pub fn swap_nodes(&mut self, first: usize, second: usize) -> Result<()> {
        self.node(first)?;
        self.node(second)?;
        if first == second {
            return Ok(());
        }
        self.nodes.swap(first, second);
        if let Some(block) = &mut self.features {
            swap_rows(block, self.feat_n, first, second);
        }
        Ok(())
    }

    /// Deep-copies node `src` over node `dest`, feature row included.
    ///
    /// The copy owns an independent adjacency set. Copying a node onto itself
    /// is a no-op.
    ///
    /// # Errors
    /// Returns [`SubgraphError::NodeOutOfBounds`] for an invalid index.
    pub fn copy_node(&mut self, dest: usize, src: usize) -> Result<()> {
        let node = self.node(src)?.clone();
        self.node(dest)?;
        if dest == src {
            return Ok(());
        }
        if let Some(block) = &mut self.features {
            let width = self.feat_n;
            block.copy_within(src * width..(src + 1) * width, dest * width);
        }
        *self.node_mut(dest)? = node;
        Ok(())
    }

    /// Deep-copies node `src` of `source` over node `dest` of this subgraph.
    ///
    /// # Errors
    /// - [`SubgraphError::NodeOutOfBounds`] for an invalid index on either
    ///   side.
    /// - [`SubgraphError::FeatureDimensionMismatch`] when the subgraphs do
    ///   not both lack features or both carry features of equal dimension.
    ///
    /// This subgraph is unchanged on error.
    pub fn copy_node_from(&mut self, dest: usize, source: &Self, src: usize) -> Result<()> {
        let node = source.node(src)?.clone();
        self.node(dest)?;
        let row = match (&self.features, &source.features) {
            (None, None) => None,
            (Some(_), Some(_)) if self.feat_n == source.feat_n => Some(source.features(src)?),
            _ => {
                return Err(SubgraphError::FeatureDimensionMismatch {
                    left: self.feat_n,
                    right: source.feat_n,
                });
            }
        };

        if let Some(row) = row {
            self.set_node_features(dest, row)?;
        }
        *self.node_mut(dest)? = node;
        Ok(())
    }

    /// Returns an independent copy of one node and its feature vector.
    ///
    /// # Errors
    /// Returns [`SubgraphError::NodeOutOfBounds`] for an invalid index.
    pub fn node_snapshot(&self, index: usize) -> Result<OwnedNode> {
        let node = self.node(index)?.clone();
        let features = match self.features {
            Some(_) => self.features(index)?.to_vec(),
            None => Vec::new(),
        };
        Ok(OwnedNode { node, features })
    }

    /// Sets every node's position to its current slot index.
    pub fn reset_positions(&mut self) {
        for (slot, node) in self.nodes.iter_mut().enumerate() {
            node.set_position(slot);
        }
    }
}

/// Swaps two distinct rows of a row-major block.
fn swap_rows(block: &mut [f32], width: usize, first: usize, second: usize) {
    let (low, high) = if first < second { (first, second) } else { (second, first) };
    let (head, tail) = block.split_at_mut(high * width);
    if let (Some(low_row), Some(high_row)) = (
        head.get_mut(low * width..(low + 1) * width),
        tail.get_mut(..width),
    ) {
        low_row.swap_with_slice(high_row);
    }
}
