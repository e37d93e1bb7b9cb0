//! Counters emitted when the `metrics` feature is enabled.

#[cfg(feature = "metrics")]
pub(crate) fn record_matrix_lookup() {
    metrics::counter!("subgraph_distance_matrix_lookups").increment(1);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_matrix_lookup() {}

#[cfg(feature = "metrics")]
pub(crate) fn record_metric_evaluation() {
    metrics::counter!("subgraph_distance_metric_evaluations").increment(1);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_metric_evaluation() {}

#[cfg(feature = "metrics")]
pub(crate) fn record_density_evaluation() {
    metrics::counter!("subgraph_density_evaluations").increment(1);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_density_evaluation() {}
