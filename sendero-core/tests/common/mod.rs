use sendero_core::{Metric, Subgraph, SubgraphBuilder};

/// Three points on a line, `0 ↔ 1` linked both ways, Euclidean, `df = 4.5`.
#[must_use]
pub fn worked_example() -> Subgraph {
    let mut graph = SubgraphBuilder::new(3)
        .with_name("worked-example")
        .with_features(vec![0.0, 1.0, 10.0], 1)
        .with_labels(vec![0, 0, 1])
        .with_metric(Metric::Euclidean)
        .with_degrees_of_freedom(4.5)
        .build()
        .expect("worked example configuration is valid");
    graph.add_arc(0, 1).expect("both nodes exist");
    graph.add_arc(1, 0).expect("both nodes exist");
    graph
}
