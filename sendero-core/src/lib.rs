//! Sendero core library.
//!
//! Data layer for optimum-path forest pipelines: a [`Subgraph`] owns node
//! records, a contiguous feature block, and optionally a precomputed distance
//! matrix, and resolves every pairwise distance through one entry point so
//! neighbourhood builders, density estimation, and forest construction agree
//! on a single distance definition.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod adjacency;
mod builder;
mod error;
pub mod metric;
mod node;
mod pairwise;
mod subgraph;
mod telemetry;
#[cfg(test)]
mod test_utils;

pub use crate::{
    adjacency::AdjacencySet,
    builder::SubgraphBuilder,
    error::{Result, SubgraphError, SubgraphErrorCode},
    metric::{ArcWeight, CustomArcWeight, DistanceError, MAX_ARC_WEIGHT, Metric, MetricError},
    node::{Node, NodeStatus, OwnedNode},
    pairwise::PairwiseDistance,
    subgraph::{DENS_MAX, DensityStats, Subgraph},
};
