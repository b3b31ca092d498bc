use super::*;
use crate::stats::median;

fn times(n: usize, dt: f64) -> Vec<f64> {
    (0..n).map(|i| i as f64 * dt).collect()
}

fn gaussian(t: f64, center: f64, sigma: f64, height: f64) -> f64 {
    height * (-(t - center).powi(2) / (2.0 * sigma * sigma)).exp()
}

#[test]
fn test_constant_trace_corrects_to_zero() {
    let trace = Trace::new(times(200, 0.05), vec![42.0; 200]).unwrap();
    let result = BaselineCorrector::default().correct(&trace).unwrap();

    assert_eq!(result.shift, 0.0);
    for &v in result.corrected.values() {
        assert!(v.abs() < 1e-6, "expected ~0, got {}", v);
    }
    for &b in result.baseline.values() {
        assert!((b - 42.0).abs() < 1e-6);
    }
}

#[test]
fn test_negative_values_shift_by_median_of_negatives() {
    let values = vec![-4.0, -1.0, 3.0, 10.0, -2.0, 5.0, 0.5, 1.0];
    let pre_shift_min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let trace = Trace::new(times(values.len(), 0.1), values.clone()).unwrap();

    let result = BaselineCorrector::default().correct(&trace).unwrap();

    assert_eq!(result.shift, median(&[-4.0, -1.0, -2.0]));
    assert_eq!(result.shift, -2.0);

    let corrected_min = result
        .corrected
        .values()
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);
    assert!(corrected_min >= pre_shift_min);

    // Shifted and rectified input
    assert_eq!(result.uncorrected.values()[0], 0.0);
    assert_eq!(result.uncorrected.values()[3], 12.0);
}

#[test]
fn test_corrected_equals_uncorrected_minus_baseline() {
    let t = times(300, 0.05);
    let values: Vec<f64> = t
        .iter()
        .map(|&x| 5.0 + 0.8 * x + gaussian(x, 7.5, 0.15, 400.0))
        .collect();
    let trace = Trace::new(t, values.clone()).unwrap();
    let result = BaselineCorrector::default().correct(&trace).unwrap();

    for i in 0..values.len() {
        let expected = values[i] - result.baseline.values()[i];
        assert!((result.corrected.values()[i] - expected).abs() < 1e-8);
    }
}

#[test]
fn test_narrow_peak_survives_drift_removal() {
    let t = times(400, 0.05);
    let values: Vec<f64> = t
        .iter()
        .map(|&x| 20.0 + 2.0 * x + gaussian(x, 10.0, 0.1, 500.0))
        .collect();
    let trace = Trace::new(t, values).unwrap();
    let result = BaselineCorrector::default().correct(&trace).unwrap();

    let peak_idx = result.corrected.argmax().unwrap();
    assert!((result.corrected.times()[peak_idx] - 10.0).abs() < 0.06);
    assert!(result.corrected.values()[peak_idx] > 400.0);

    // Far from the peak the drift is mostly removed
    let far = result.corrected.values()[50];
    assert!(far.abs() < 5.0, "residual drift {}", far);
}

#[test]
fn test_time_axis_preserved() {
    let trace = Trace::new(vec![0.0, 0.5, 1.0], vec![1.0, 8.0, 1.0]).unwrap();
    let result = BaselineCorrector::default().correct(&trace).unwrap();
    assert_eq!(result.corrected.times(), trace.times());
    assert_eq!(result.baseline.times(), trace.times());
}

#[test]
fn test_empty_trace_rejected() {
    let err = BaselineCorrector::default().correct(&Trace::empty()).unwrap_err();
    assert_eq!(err, TraceError::Empty);
}

#[test]
fn test_negative_shift_helper() {
    assert_eq!(negative_shift(&[1.0, 2.0]), 0.0);
    assert_eq!(negative_shift(&[-3.0, 1.0, -1.0]), -2.0);
}
