//! End-to-end behaviour of the subgraph data layer through the public API.

mod common;

use rstest::{fixture, rstest};
use sendero_core::{
    ArcWeight, DENS_MAX, Metric, PairwiseDistance, Subgraph, SubgraphError, SubgraphErrorCode,
};
use sendero_test_support::{approx::assert_close, tracing::RecordingLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use common::worked_example;

#[fixture]
fn example() -> Subgraph {
    worked_example()
}

/// Sum of distances from `query` to every other item, written against the
/// trait so it works for any distance source.
fn eccentricity<S: PairwiseDistance>(source: &S, query: usize) -> sendero_core::Result<f32> {
    let others: Vec<usize> = (0..source.len()).filter(|&i| i != query).collect();
    Ok(source.batch_distances(query, &others)?.into_iter().sum())
}

#[rstest]
fn worked_example_densities(mut example: Subgraph) {
    example.evaluate_density().expect("density should evaluate");

    let isolated = example.node(2).expect("node exists");
    assert_close(isolated.density(), 1.0, 1e-6);
    assert_close(isolated.path_value(), 0.0, 1e-6);
    for index in 0..2 {
        let node = example.node(index).expect("node exists");
        assert_close(node.density(), DENS_MAX, 1e-3);
        assert_close(node.path_value(), DENS_MAX - 1.0, 1e-3);
    }
}

#[rstest]
fn distances_agree_between_metric_and_matrix(mut example: Subgraph) {
    let by_metric = eccentricity(&example, 1).expect("distances resolve");
    example.refresh_distance_matrix().expect("metric and features are set");
    let by_matrix = eccentricity(&example, 1).expect("distances resolve");

    assert_close(by_metric, 1.0 + 81.0, 1e-4);
    assert_close(by_matrix, by_metric, 1e-4);
}

#[rstest]
fn grown_subgraph_needs_features_before_density(mut example: Subgraph) {
    example.resize(4).expect("resize should succeed");
    example.add_arc(3, 2).expect("both nodes exist");

    let err = example.evaluate_density().expect_err("new row is NaN");
    assert_eq!(err.code(), SubgraphErrorCode::NonFiniteDistance);

    example
        .set_node_features(3, &[11.0])
        .expect("row has feat_n values");
    example.evaluate_density().expect("density should evaluate");
    assert!(
        example
            .nodes()
            .iter()
            .all(|node| (1.0..=DENS_MAX).contains(&node.density()))
    );
}

#[rstest]
fn metric_selection_by_name(mut example: Subgraph) {
    let metric: Metric = "Manhattan".parse().expect("catalogued metric");
    example.set_metric(None, metric);
    assert_close(example.distance(0, 2).expect("distance resolves"), 10.0, 1e-6);

    let err = "cosine".parse::<Metric>().expect_err("not catalogued");
    assert_eq!(err.to_string(), "unknown metric `cosine`");
    assert_eq!(
        example.arc_weight().and_then(ArcWeight::metric),
        Some(Metric::Manhattan),
    );
}

#[rstest]
fn split_then_merge_restores_every_row(example: Subgraph) {
    let (first, second) = example.split(0.5, 42).expect("fraction is valid");
    let merged = Subgraph::merge(&first, &second).expect("dimensions agree");

    assert_eq!(merged.node_n(), example.node_n());
    let mut rows: Vec<f32> = merged
        .feature_block()
        .expect("features carried")
        .to_vec();
    rows.sort_by(f32::total_cmp);
    assert_eq!(rows, vec![0.0, 1.0, 10.0]);
    assert_eq!(merged.label_count(), example.label_count());
}

#[rstest]
fn destroyed_subgraph_rejects_configuration(mut example: Subgraph) {
    example.destroy();
    example.destroy();
    assert_eq!(
        example.set_precomputed_distances(&[], None),
        Err(SubgraphError::Destroyed),
    );
    assert!(example.nodes().is_empty());
}

#[rstest]
fn density_evaluation_is_instrumented(mut example: Subgraph) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || example.evaluate_density())
        .expect("density should evaluate");

    let span = layer
        .span_named("subgraph.evaluate_density")
        .expect("density span recorded");
    assert_eq!(span.field("data_source"), Some("worked-example"));
    assert_eq!(span.field("nodes"), Some("3"));
}

#[rstest]
fn failures_are_recorded_on_the_span(mut example: Subgraph) {
    let (result, layer) =
        sendero_test_support::tracing::capture(|| example.set_features(&[1.0], None, 1));

    assert!(result.is_err());
    let error_events = layer.events_at(Level::ERROR);
    assert_eq!(error_events.len(), 1, "instrumented errors emit one event");
    assert!(
        error_events[0]
            .field("error")
            .is_some_and(|message| message.contains("feature")),
    );
}

#[rstest]
fn resizing_a_matrix_backed_subgraph_warns(mut example: Subgraph) {
    example.refresh_distance_matrix().expect("metric and features are set");

    let (result, layer) = sendero_test_support::tracing::capture(|| example.resize(4));

    result.expect("resize should succeed");
    let warnings = layer.events_at(Level::WARN);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("missing"), Some("7"));
    assert_eq!(warnings[0].field("stride"), Some("4"));
}
