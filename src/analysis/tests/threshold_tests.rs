//! Tests for the threshold policies

extern crate std;

use crate::analysis::threshold::ThresholdPolicy;
use crate::raster::errors::HotspotError;

#[test]
fn test_percentile_linear_interpolation() {
    // {1, 2, 3, 100} at p=75 interpolates between 3 and 100 at 0.25
    let values = vec![1.0, 2.0, 3.0, 100.0];
    let threshold = ThresholdPolicy::Percentile(75.0).estimate(&values).unwrap();
    std::assert!((threshold - 27.25).abs() < 1e-10);
}

#[test]
fn test_percentile_extremes() {
    let values = vec![4.0, 1.0, 3.0, 2.0];

    let p0 = ThresholdPolicy::Percentile(0.0).estimate(&values).unwrap();
    std::assert_eq!(p0, 1.0);

    let p100 = ThresholdPolicy::Percentile(100.0).estimate(&values).unwrap();
    std::assert_eq!(p100, 4.0);
}

#[test]
fn test_percentile_single_value() {
    let threshold = ThresholdPolicy::Percentile(50.0).estimate(&[7.5]).unwrap();
    std::assert_eq!(threshold, 7.5);
}

#[test]
fn test_iqr_outlier_bound() {
    // Same population, Q1/Q3 by the same interpolation rule:
    // Q1 = 1.75, Q3 = 27.25, IQR = 25.5, bound = 27.25 + 1.5 * 25.5
    let values = vec![1.0, 2.0, 3.0, 100.0];
    let threshold = ThresholdPolicy::IqrOutlier(1.5).estimate(&values).unwrap();
    std::assert!((threshold - 65.5).abs() < 1e-10);
}

#[test]
fn test_iqr_zero_multiplier_is_q3() {
    let values = vec![1.0, 2.0, 3.0, 100.0];
    let threshold = ThresholdPolicy::IqrOutlier(0.0).estimate(&values).unwrap();
    std::assert!((threshold - 27.25).abs() < 1e-10);
}

#[test]
fn test_iqr_zero_variance() {
    // All-equal input: IQR = 0, bound equals the constant for any m
    let values = vec![5.0; 12];
    for m in [0.0, 1.5, 100.0] {
        let threshold = ThresholdPolicy::IqrOutlier(m).estimate(&values).unwrap();
        std::assert_eq!(threshold, 5.0);
    }
}

#[test]
fn test_empty_input_fails() {
    match ThresholdPolicy::Percentile(97.0).estimate(&[]) {
        Err(HotspotError::EmptyValidData) => {}
        other => std::panic!("expected EmptyValidData, got {:?}", other),
    }

    match ThresholdPolicy::IqrOutlier(1.5).estimate(&[]) {
        Err(HotspotError::EmptyValidData) => {}
        other => std::panic!("expected EmptyValidData, got {:?}", other),
    }
}

#[test]
fn test_parameter_validation() {
    std::assert!(ThresholdPolicy::Percentile(-1.0).estimate(&[1.0]).is_err());
    std::assert!(ThresholdPolicy::Percentile(100.5).estimate(&[1.0]).is_err());
    std::assert!(ThresholdPolicy::IqrOutlier(-0.1).estimate(&[1.0]).is_err());
    std::assert!(ThresholdPolicy::Percentile(0.0).validate().is_ok());
    std::assert!(ThresholdPolicy::Percentile(100.0).validate().is_ok());
}
