//! Integration tests for the metric catalogue.

use rstest::rstest;
use sendero_core::{
    ArcWeight, DistanceError, MAX_ARC_WEIGHT, Metric, MetricError,
    metric::VectorKind,
};
use sendero_test_support::approx::assert_close;

#[rstest]
#[case(Metric::Euclidean, 25.0)]
#[case(Metric::Manhattan, 7.0)]
#[case(Metric::SquaredChord, 2.071_797)]
#[case(Metric::BrayCurtis, 7.0 / 13.0)]
fn validated_distances(#[case] metric: Metric, #[case] expected: f32) {
    let distance = metric
        .distance(&[1.0, 2.0], &[4.0, 6.0])
        .expect("inputs are valid");
    assert_close(distance.value(), expected, 1e-5);
}

#[test]
fn log_euclidean_scales_by_the_arc_weight_ceiling() {
    let distance = Metric::LogEuclidean
        .distance(&[0.0], &[1.0])
        .expect("inputs are valid");
    let expected = (MAX_ARC_WEIGHT * 2.0_f64.ln()) as f32;
    assert!((distance.value() - expected).abs() / expected < 1e-6);
}

#[test]
fn validation_rejects_bad_inputs() {
    assert_eq!(
        Metric::Euclidean.distance(&[], &[1.0]),
        Err(DistanceError::ZeroLength),
    );
    assert!(matches!(
        Metric::Manhattan.distance(&[1.0], &[1.0, 2.0]),
        Err(DistanceError::DimensionMismatch { left: 1, right: 2 }),
    ));
    assert!(matches!(
        Metric::Canberra.distance(&[1.0], &[f32::NAN]),
        Err(DistanceError::NonFinite { which: VectorKind::Right, index: 0, .. }),
    ));
    assert_eq!(
        Metric::NoMetric.distance(&[1.0], &[1.0]),
        Err(DistanceError::Undefined),
    );
}

#[test]
fn names_round_trip() {
    for metric in Metric::ALL {
        assert_eq!(metric.name().parse::<Metric>(), Ok(metric));
    }
    assert_eq!("squared_chi_square".parse::<Metric>(), Ok(Metric::SquaredChiSquare));
    assert_eq!(
        "hamming".parse::<Metric>(),
        Err(MetricError::Unknown { name: "hamming".to_owned() }),
    );
}

#[test]
fn arc_weight_debug_hides_closures() {
    let custom = ArcWeight::custom(|_, _| 1.0);
    assert_eq!(format!("{custom:?}"), "Custom(..)");
    assert_eq!(format!("{:?}", ArcWeight::Named(Metric::Canberra)), "Named(Canberra)");
    assert!(ArcWeight::Named(Metric::NoMetric).evaluate(&[1.0], &[2.0]).is_nan());
}
