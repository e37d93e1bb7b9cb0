//! Shared test utilities for `sendero-core`.

use proptest::test_runner::Config as ProptestConfig;
use sendero_test_support::proptest_profile::ProptestRunProfile;

use crate::{metric::Metric, subgraph::Subgraph};

/// Builds a proptest configuration from the shared run profile so every
/// property suite honours the same environment overrides.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// One-dimensional subgraph with one node per value and the given metric.
pub(crate) fn line_subgraph(values: &[f32], metric: Metric) -> Subgraph {
    let mut graph = Subgraph::new(values.len()).expect("allocation should succeed");
    graph
        .set_features(values, None, 1)
        .expect("one feature per node");
    graph.set_metric(None, metric);
    graph
}
