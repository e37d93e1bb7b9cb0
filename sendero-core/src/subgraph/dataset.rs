//! Dataset-level operations: normalisation, ordering, splitting, merging.

use std::{cmp::Ordering, collections::BTreeMap, sync::Arc};

use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};
use tracing::{debug, instrument};

use super::{Subgraph, checked_area, matrix::DistanceMatrix, try_with_capacity};
use crate::{
    error::{Result, SubgraphError},
    node::Node,
};

impl Subgraph {
    /// Number of distinct ground-truth labels, ignoring unlabelled nodes.
    #[must_use]
    pub fn label_count(&self) -> usize {
        let mut labels: Vec<u32> = self.nodes.iter().filter_map(Node::label_true).collect();
        labels.sort_unstable();
        labels.dedup();
        labels.len()
    }

    /// Z-score normalises every feature column in place.
    ///
    /// Columns with zero standard deviation are only centred. An attached
    /// distance matrix is not recomputed.
    ///
    /// # Errors
    /// Returns [`SubgraphError::FeaturesUnset`] without a feature block.
    #[instrument(
        name = "subgraph.normalize_features",
        err,
        skip(self),
        fields(data_source = %self.name, nodes = self.nodes.len(), feat_n = self.feat_n),
    )]
    pub fn normalize_features(&mut self) -> Result<()> {
        let width = self.feat_n;
        let block = self.features.as_mut().ok_or(SubgraphError::FeaturesUnset)?;
        if block.is_empty() {
            return Ok(());
        }
        #[expect(
            clippy::cast_precision_loss,
            reason = "node counts are far below 2^52"
        )]
        let count = (block.len() / width) as f64;

        for column in 0..width {
            let mean = block
                .iter()
                .skip(column)
                .step_by(width)
                .map(|&value| f64::from(value))
                .sum::<f64>()
                / count;
            let variance = block
                .iter()
                .skip(column)
                .step_by(width)
                .map(|&value| (f64::from(value) - mean).powi(2))
                .sum::<f64>()
                / count;
            let std_dev = variance.sqrt();
            for value in block.iter_mut().skip(column).step_by(width) {
                let centred = f64::from(*value) - mean;
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "normalised features are stored at input precision"
                )]
                let scaled = (if std_dev > 0.0 { centred / std_dev } else { centred }) as f32;
                *value = scaled;
            }
        }
        Ok(())
    }

    /// Sorts the ordered view by ascending path value.
    ///
    /// NaN path values sort last; ties keep ascending identifier order.
    /// Identifiers outside the subgraph sort after every valid one.
    pub fn sort_ordered_by_path_value(&mut self) {
        let nodes = &self.nodes;
        let key = |id: usize| nodes.get(id).map_or(f32::NAN, Node::path_value);
        self.ordered.sort_by(|&left, &right| {
            let (a, b) = (key(left), key(right));
            let by_value = match (a.is_nan(), b.is_nan()) {
                (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (true, true) => Ordering::Equal,
            };
            by_value.then(left.cmp(&right))
        });
    }

    /// Splits the subgraph into two parts stratified by ground-truth label.
    ///
    /// Within each label class (unlabelled nodes form their own class),
    /// `round(fraction · class size)` nodes are drawn into the first part by
    /// a shuffle seeded with `seed`; the rest go to the second. Each part
    /// lists its nodes in ascending source-slot order, with positions re-keyed
    /// to slots and adjacency released. Features, metric, degrees of freedom,
    /// and the matching sub-matrix of an attached distance matrix are
    /// carried over.
    ///
    /// # Errors
    /// Returns [`SubgraphError::InvalidSplitFraction`] unless
    /// `0 <= fraction <= 1`, and [`SubgraphError::Allocation`] when a part
    /// cannot be allocated.
    #[instrument(
        name = "subgraph.split",
        err,
        skip(self),
        fields(data_source = %self.name, nodes = self.nodes.len()),
    )]
    pub fn split(&self, fraction: f32, seed: u64) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(SubgraphError::InvalidSplitFraction { got: fraction });
        }

        let mut classes: BTreeMap<Option<u32>, Vec<usize>> = BTreeMap::new();
        for (index, node) in self.nodes.iter().enumerate() {
            classes.entry(node.label_true()).or_default().push(index);
        }

        let mut rng = SmallRng::seed_from_u64(seed);
        let mut first = Vec::new();
        let mut second = Vec::new();
        for members in classes.values_mut() {
            members.shuffle(&mut rng);
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::cast_precision_loss,
                reason = "the product is a rounded, non-negative count no larger than the class"
            )]
            let take = ((members.len() as f64) * f64::from(fraction)).round() as usize;
            let (drawn, rest) = members.split_at(take.min(members.len()));
            first.extend_from_slice(drawn);
            second.extend_from_slice(rest);
        }
        first.sort_unstable();
        second.sort_unstable();
        debug!(
            first = first.len(),
            second = second.len(),
            classes = classes.len(),
            "subgraph split"
        );

        Ok((self.extract(&first)?, self.extract(&second)?))
    }

    /// Builds a new subgraph from the listed slots, in list order.
    ///
    /// # Errors
    /// Returns [`SubgraphError::NodeOutOfBounds`] for an invalid slot and
    /// [`SubgraphError::Allocation`] when buffers cannot be allocated.
    pub fn extract(&self, slots: &[usize]) -> Result<Self> {
        let mut part = Self::new(0)?.with_name(Arc::clone(&self.name));
        let mut nodes = try_with_capacity("node array", slots.len())?;
        for (slot, &index) in slots.iter().enumerate() {
            nodes.push(self.node(index)?.detached(slot));
        }

        if self.features.is_some() {
            let len = checked_area("feature block", slots.len(), self.feat_n)?;
            let mut block = try_with_capacity("feature block", len)?;
            for &index in slots {
                block.extend_from_slice(self.features(index)?);
            }
            part.features = Some(block);
            part.feat_n = self.feat_n;
        }

        if let Some(matrix) = &self.matrix {
            let len = checked_area("distance matrix", slots.len(), slots.len())?;
            let mut values = try_with_capacity("distance matrix", len)?;
            for &row in slots {
                for &col in slots {
                    let value = matrix
                        .get(self.node(row)?.position(), self.node(col)?.position())
                        .unwrap_or(f32::NAN);
                    values.push(value);
                }
            }
            part.matrix = Some(DistanceMatrix::new(values, slots.len()));
        }

        part.ordered = (0..nodes.len()).collect();
        part.nodes = nodes;
        part.arc_weight.clone_from(&self.arc_weight);
        part.df = self.df;
        Ok(part)
    }

    /// Concatenates two subgraphs: the nodes of `first` followed by those of
    /// `second`.
    ///
    /// Positions are re-keyed to the new slots and adjacency is released.
    /// The metric and degrees of freedom come from `first`, falling back to
    /// `second`. Distance matrices are not carried; call
    /// [`Subgraph::refresh_distance_matrix`] if one is needed.
    ///
    /// # Errors
    /// Returns [`SubgraphError::FeatureDimensionMismatch`] unless both inputs
    /// lack features or share a feature dimension, and
    /// [`SubgraphError::Allocation`] when buffers cannot be allocated.
    #[instrument(
        name = "subgraph.merge",
        err,
        skip_all,
        fields(data_source = %first.name, first = first.nodes.len(), second = second.nodes.len()),
    )]
    pub fn merge(first: &Self, second: &Self) -> Result<Self> {
        let features = match (&first.features, &second.features) {
            (None, None) => None,
            (Some(left), Some(right)) if first.feat_n == second.feat_n => Some((left, right)),
            _ => {
                return Err(SubgraphError::FeatureDimensionMismatch {
                    left: first.feat_n,
                    right: second.feat_n,
                });
            }
        };
        let node_n = first
            .nodes
            .len()
            .checked_add(second.nodes.len())
            .ok_or(SubgraphError::Allocation {
                what: "node array",
                requested: usize::MAX,
            })?;

        let mut merged = Self::new(0)?.with_name(Arc::clone(&first.name));
        let mut nodes = try_with_capacity("node array", node_n)?;
        nodes.extend(
            first
                .nodes
                .iter()
                .chain(&second.nodes)
                .enumerate()
                .map(|(slot, node)| node.detached(slot)),
        );

        if let Some((left, right)) = features {
            let len = checked_area("feature block", node_n, first.feat_n)?;
            let mut block = try_with_capacity("feature block", len)?;
            block.extend_from_slice(left);
            block.extend_from_slice(right);
            merged.features = Some(block);
            merged.feat_n = first.feat_n;
        }

        merged.ordered = (0..node_n).collect();
        merged.nodes = nodes;
        merged.arc_weight = first.arc_weight.clone().or_else(|| second.arc_weight.clone());
        merged.df = first.df.or(second.df);
        Ok(merged)
    }
}
