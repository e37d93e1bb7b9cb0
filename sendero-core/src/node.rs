//! Per-sample node records.
//!
//! A [`Node`] holds forest and density state but no features: feature vectors
//! live in the owning subgraph's contiguous block and are addressed by slot.

use bitflags::bitflags;

use crate::adjacency::AdjacencySet;

bitflags! {
    /// Marker bits set by forest-building and pruning algorithms.
    ///
    /// Bits other than the named ones are preserved so algorithms can carry
    /// private markers.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct NodeStatus: u8 {
        /// The node is a prototype (a root candidate of the forest).
        const PROTOTYPE = 1;
        const _ = !0;
    }
}

/// One sample of a subgraph.
///
/// Scores use NaN for "not yet computed"; labels and forest links use `None`.
///
/// # Examples
/// ```
/// use sendero_core::Node;
///
/// let node = Node::cleared(4);
/// assert_eq!(node.position(), 4);
/// assert!(node.path_value().is_nan());
/// assert_eq!(node.label(), None);
/// assert!(node.adjacency().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    position: usize,
    path_value: f32,
    density: f32,
    radius: f32,
    label: Option<u32>,
    label_true: Option<u32>,
    root: Option<usize>,
    pred: Option<usize>,
    status: NodeStatus,
    adjacency: AdjacencySet,
    neighbor_count: usize,
}

impl Node {
    /// Creates a node in the cleared state with the given identity.
    #[must_use]
    pub fn cleared(position: usize) -> Self {
        Self {
            position,
            path_value: f32::NAN,
            density: f32::NAN,
            radius: f32::NAN,
            label: None,
            label_true: None,
            root: None,
            pred: None,
            status: NodeStatus::empty(),
            adjacency: AdjacencySet::new(),
            neighbor_count: 0,
        }
    }

    /// Returns whether every field other than `position` is cleared.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.path_value.is_nan()
            && self.density.is_nan()
            && self.radius.is_nan()
            && self.label.is_none()
            && self.label_true.is_none()
            && self.root.is_none()
            && self.pred.is_none()
            && self.status.is_empty()
            && self.adjacency.is_empty()
            && self.neighbor_count == 0
    }

    /// Identity assigned at creation. It moves with the record on swaps.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Overrides the identity, e.g. after a caller-driven reordering.
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Accumulated path cost; NaN until computed.
    #[must_use]
    pub fn path_value(&self) -> f32 {
        self.path_value
    }

    /// Overwrites the path cost.
    pub fn set_path_value(&mut self, value: f32) {
        self.path_value = value;
    }

    /// Rescaled density; NaN until computed.
    #[must_use]
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Overwrites the density.
    pub fn set_density(&mut self, value: f32) {
        self.density = value;
    }

    /// Kernel or adjacency radius; NaN until computed.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Overwrites the radius.
    pub fn set_radius(&mut self, value: f32) {
        self.radius = value;
    }

    /// Label assigned by the classifier.
    #[must_use]
    pub fn label(&self) -> Option<u32> {
        self.label
    }

    /// Assigns or clears the classifier label.
    pub fn set_label(&mut self, label: Option<u32>) {
        self.label = label;
    }

    /// Ground-truth label supplied by the loader.
    #[must_use]
    pub fn label_true(&self) -> Option<u32> {
        self.label_true
    }

    /// Assigns or clears the ground-truth label.
    pub fn set_label_true(&mut self, label: Option<u32>) {
        self.label_true = label;
    }

    /// Root of the tree this node belongs to.
    #[must_use]
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// Links the node to a tree root.
    pub fn set_root(&mut self, root: Option<usize>) {
        self.root = root;
    }

    /// Immediate predecessor in the forest.
    #[must_use]
    pub fn pred(&self) -> Option<usize> {
        self.pred
    }

    /// Links the node to its predecessor.
    pub fn set_pred(&mut self, pred: Option<usize>) {
        self.pred = pred;
    }

    /// Marker bits.
    #[must_use]
    pub fn status(&self) -> NodeStatus {
        self.status
    }

    /// Replaces every marker bit.
    pub fn set_status(&mut self, status: NodeStatus) {
        self.status = status;
    }

    /// Returns whether the [`NodeStatus::PROTOTYPE`] bit is set.
    #[must_use]
    pub fn is_prototype(&self) -> bool {
        self.status.contains(NodeStatus::PROTOTYPE)
    }

    /// Neighbour identifiers, in insertion order.
    #[must_use]
    pub fn adjacency(&self) -> &AdjacencySet {
        &self.adjacency
    }

    /// Mutable neighbour set.
    pub fn adjacency_mut(&mut self) -> &mut AdjacencySet {
        &mut self.adjacency
    }

    /// Size hint paired with the adjacency set.
    #[must_use]
    pub fn neighbor_count(&self) -> usize {
        self.neighbor_count
    }

    /// Overwrites the size hint; the adjacency set is not touched.
    pub fn set_neighbor_count(&mut self, count: usize) {
        self.neighbor_count = count;
    }

    /// Copy of this node with its adjacency released and a new identity.
    pub(crate) fn detached(&self, position: usize) -> Self {
        Self {
            position,
            adjacency: AdjacencySet::new(),
            neighbor_count: 0,
            ..*self
        }
    }
}

/// A node detached from any subgraph, owning its own feature vector.
///
/// Returned by [`crate::Subgraph::node_snapshot`]; mutating it never affects
/// the subgraph it was taken from.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedNode {
    /// The node record, with an independent adjacency set.
    pub node: Node,
    /// Feature vector copied out of the feature block; empty when the
    /// subgraph had no features attached.
    pub features: Vec<f32>,
}
