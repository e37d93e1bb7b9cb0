use rstest::rstest;
use sendero_core::{SubgraphError, SubgraphErrorCode};

#[rstest]
#[case(
    SubgraphError::Allocation { what: "node array", requested: 3 },
    SubgraphErrorCode::Allocation,
    "SUBGRAPH_ALLOCATION",
)]
#[case(SubgraphError::Destroyed, SubgraphErrorCode::Destroyed, "SUBGRAPH_DESTROYED")]
#[case(
    SubgraphError::FeatureLengthMismatch { expected: 4, got: 3 },
    SubgraphErrorCode::FeatureLengthMismatch,
    "SUBGRAPH_FEATURE_LENGTH_MISMATCH",
)]
#[case(
    SubgraphError::NodeOutOfBounds { index: 9, len: 2 },
    SubgraphErrorCode::NodeOutOfBounds,
    "SUBGRAPH_NODE_OUT_OF_BOUNDS",
)]
#[case(
    SubgraphError::NoDistanceFunction,
    SubgraphErrorCode::NoDistanceFunction,
    "SUBGRAPH_NO_DISTANCE_FUNCTION",
)]
#[case(
    SubgraphError::PositionOutsideMatrix { position: 5, stride: 2 },
    SubgraphErrorCode::PositionOutsideMatrix,
    "SUBGRAPH_POSITION_OUTSIDE_MATRIX",
)]
#[case(
    SubgraphError::NonFiniteDistance { left: 0, right: 1 },
    SubgraphErrorCode::NonFiniteDistance,
    "SUBGRAPH_NON_FINITE_DISTANCE",
)]
#[case(
    SubgraphError::DegreesOfFreedomUnset,
    SubgraphErrorCode::DegreesOfFreedomUnset,
    "SUBGRAPH_DF_UNSET",
)]
#[case(
    SubgraphError::InvalidSplitFraction { got: 2.0 },
    SubgraphErrorCode::InvalidSplitFraction,
    "SUBGRAPH_INVALID_SPLIT_FRACTION",
)]
fn returns_expected_code(
    #[case] error: SubgraphError,
    #[case] expected: SubgraphErrorCode,
    #[case] text: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(expected.as_str(), text);
    assert_eq!(expected.to_string(), text);
}

#[test]
fn messages_name_the_offending_values() {
    let err = SubgraphError::NodeOutOfBounds { index: 9, len: 2 };
    assert_eq!(
        err.to_string(),
        "node 9 is out of bounds for a subgraph of 2 nodes",
    );
}
