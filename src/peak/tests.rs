use super::*;
use crate::trace::Trace;

fn gaussian(t: f64, center: f64, sigma: f64, height: f64) -> f64 {
    height * (-(t - center).powi(2) / (2.0 * sigma * sigma)).exp()
}

fn reference_trace() -> Trace {
    let times = crate::stats::linspace(0.0, 10.0, 100);
    let values = times
        .iter()
        .map(|&t| 1000.0 + gaussian(t, 5.0, 0.5, 50_000.0))
        .collect();
    Trace::new(times, values).unwrap()
}

#[test]
fn test_gaussian_peak_integration() {
    let record = PeakIntegrator::ms()
        .integrate_ms(&reference_trace(), 5.0)
        .unwrap();

    assert_eq!(record.integration_method, IntegrationMethod::Trapezoidal);
    assert!(record.total_area > 0.0);
    assert!(record.baseline_corrected_area > 0.0);
    assert!(record.baseline_corrected_area < record.total_area);
    assert!(record.peak_height > 0.0);
    assert!((0.0..=1.0).contains(&record.quality_score));
    assert!(record.start_time < 5.0 && 5.0 < record.end_time);

    // Area under a 50000-high, sigma 0.5 Gaussian is about 62666
    assert!((record.baseline_corrected_area - 62_624.35).abs() < 1.0);
    assert_eq!(record.start_index, 29);
    assert_eq!(record.end_index, 70);
    assert!(record.snr > 1000.0);
    assert!(record.quality_score > 0.95);
}

#[test]
fn test_short_trace_is_insufficient() {
    let trace = Trace::new(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 5.0, 3.0, 2.0]).unwrap();
    let err = PeakIntegrator::ms().integrate_ms(&trace, 1.0).unwrap_err();
    assert_eq!(
        err,
        PeakIntegrationError::InsufficientData {
            required: 5,
            got: 4
        }
    );
}

#[test]
fn test_short_trace_falls_back_to_sum() {
    let trace = Trace::new(vec![0.5, 1.0, 2.0], vec![1.0, 5.0, 3.0]).unwrap();
    let record = PeakIntegrator::ms().integrate_or_fallback(&trace, 1.0, TraceOrigin::MsXic);

    assert_eq!(record.integration_method, IntegrationMethod::FallbackSum);
    assert_eq!(record.integration_method.to_string(), "fallback_sum");
    assert_eq!(record.total_area, 9.0);
    assert_eq!(record.baseline_corrected_area, 9.0);
    assert_eq!(record.peak_height, 5.0);
    assert_eq!(record.start_time, 0.5);
    assert_eq!(record.end_time, 2.0);
    assert_eq!(record.snr, 0.0);
    assert_eq!(record.quality_score, 0.0);
}

#[test]
fn test_empty_trace_falls_back_to_zero_record() {
    let record =
        PeakIntegrator::lc().integrate_or_fallback(&Trace::empty(), 0.0, TraceOrigin::LcCorrected);
    assert_eq!(record.integration_method, IntegrationMethod::FallbackSum);
    assert_eq!(record.total_area, 0.0);
    assert_eq!(record.peak_height, 0.0);
    assert_eq!(record.start_time, 0.0);
}

#[test]
fn test_lc_origin_skips_second_correction() {
    let record = PeakIntegrator::lc()
        .integrate_lc(&reference_trace(), 5.0)
        .unwrap();
    assert_eq!(record.total_area, record.baseline_corrected_area);
    assert_eq!(record.baseline_start, 0.0);
    assert_eq!(record.baseline_end, 0.0);

    let trace = reference_trace();
    let apex = trace.argmax().unwrap();
    assert_eq!(record.peak_height, trace.values()[apex]);
}

#[test]
fn test_shallow_valley_splits_neighbouring_peaks() {
    let times: Vec<f64> = (0..200).map(|i| i as f64 * 0.05).collect();
    let values: Vec<f64> = times
        .iter()
        .map(|&t| 1000.0 + gaussian(t, 4.0, 0.15, 40_000.0) + gaussian(t, 5.0, 0.15, 30_000.0))
        .collect();
    let trace = Trace::new(times, values).unwrap();
    let integrator = PeakIntegrator::ms();

    let first = integrator.integrate_ms(&trace, 4.0).unwrap();
    let second = integrator.integrate_ms(&trace, 5.0).unwrap();

    assert_eq!(first.end_index, 90);
    assert_eq!(second.start_index, 90);
    assert!((first.end_time - 4.5).abs() < 1e-9);
    assert!(first.start_time < 4.0);
    assert!(second.end_time > 5.0);
}

#[test]
fn test_narrow_window_widened_to_min_width() {
    let times: Vec<f64> = (0..201).map(|i| i as f64 * 0.01).collect();
    let mut values = vec![0.0; 201];
    values[100] = 5000.0;
    let trace = Trace::new(times, values).unwrap();

    let record = PeakIntegrator::ms().integrate_ms(&trace, 1.0).unwrap();
    assert_eq!(record.start_index, 95);
    assert_eq!(record.end_index, 105);
    assert!((record.width() - 0.1).abs() < 1e-9);
    assert_eq!(record.peak_height, 5000.0);
    // Zero noise gives zero SNR and the low-SNR penalty
    assert_eq!(record.snr, 0.0);
    assert!(record.quality_score < 0.5);
}

#[test]
fn test_time_limit_holds_boundaries_at_apex() {
    let times: Vec<f64> = (0..201).map(|i| i as f64 * 0.01).collect();
    let values: Vec<f64> = times.iter().map(|&t| gaussian(t, 1.0, 0.5, 10_000.0)).collect();
    let limited = IntegrationConfig {
        min_peak_width: 0.1,
        max_peak_width: 0.15,
        noise_threshold: 0.0,
    };

    // Every sample within the time limit stays above the floor
    let bounds = detect_boundaries(&times, &values, 100, &limited).unwrap();
    assert_eq!((bounds.start, bounds.end), (95, 105));
    assert_eq!(bounds.sample_count(), 11);

    let unlimited = IntegrationConfig {
        max_peak_width: 5.0,
        ..limited
    };
    let bounds = detect_boundaries(&times, &values, 100, &unlimited).unwrap();
    assert!(bounds.start < 85);
    assert!(bounds.end > 115);
}

#[test]
fn test_degenerate_window_uses_fixed_width() {
    let times = vec![0.0, 0.3, 0.6, 0.9, 1.2, 1.5, 1.8];
    let values = vec![50.0, 60.0, 80.0, 100.0, 80.0, 60.0, 50.0];
    let config = IntegrationConfig {
        min_peak_width: 0.2,
        max_peak_width: 0.5,
        noise_threshold: 0.0,
    };

    assert!(matches!(
        detect_boundaries(&times, &values, 3, &config),
        Err(PeakIntegrationError::BoundaryDetection(_))
    ));

    let trace = Trace::new(times, values).unwrap();
    let record = PeakIntegrator::new(config).integrate_ms(&trace, 0.9).unwrap();
    assert_eq!(record.integration_method, IntegrationMethod::Trapezoidal);
    assert_eq!(record.start_index, 2);
    assert_eq!(record.end_index, 4);
    assert!((record.total_area - 54.0).abs() < 1e-9);
    assert!((record.baseline_corrected_area - 6.0).abs() < 1e-9);
    assert!((record.peak_height - 20.0).abs() < 1e-9);
}

#[test]
fn test_invalid_config_rejected() {
    let config = IntegrationConfig {
        min_peak_width: 3.0,
        max_peak_width: 1.0,
        noise_threshold: 0.0,
    };
    let err = PeakIntegrator::new(config)
        .integrate_ms(&reference_trace(), 5.0)
        .unwrap_err();
    assert!(matches!(err, PeakIntegrationError::InvalidConfig(_)));
}

#[test]
fn test_adaptive_floor_terms() {
    let flat = vec![10.0; 20];
    assert_eq!(adaptive_floor(&flat, 100.0, 0.0), 10.0);
    assert_eq!(adaptive_floor(&flat, 100.0, 50.0), 50.0);
    assert_eq!(adaptive_floor(&flat, 10_000.0, 0.0), 200.0);
}

#[test]
fn test_linear_baseline_spans_window() {
    let values = [0.0, 2.0, 9.0, 4.0, 6.0];
    let bounds = PeakBounds {
        start: 1,
        end: 4,
        baseline_start: 2.0,
        baseline_end: 6.0,
    };
    let baseline = linear_baseline(&values, &bounds);
    assert_eq!(baseline.len(), 4);
    assert_eq!(baseline.first(), Some(&2.0));
    assert_eq!(baseline.last(), Some(&6.0));
}

#[test]
fn test_quality_low_snr_penalty() {
    let values = [10.0, 0.0, 10.0, 0.0, 10.0, 12.0, 10.0, 0.0, 10.0, 0.0, 10.0];
    let bounds = PeakBounds {
        start: 4,
        end: 6,
        baseline_start: 10.0,
        baseline_end: 10.0,
    };
    let metrics = quality::quality_metrics(&values, &[0.0; 3], &bounds, 5);

    assert!(metrics.snr < 3.0);
    let unpenalised = 0.4 * (metrics.snr / 50.0).min(1.0)
        + 0.35 * metrics.symmetry
        + 0.25 * metrics.baseline_stability;
    assert!((metrics.quality_score - 0.5 * unpenalised).abs() < 1e-12);
}

#[test]
fn test_noise_region_flanks() {
    let values: Vec<f64> = (0..60).map(|i| i as f64).collect();
    let bounds = PeakBounds {
        start: 25,
        end: 30,
        baseline_start: 25.0,
        baseline_end: 30.0,
    };
    let region = quality::noise_region(&values, &bounds);
    assert_eq!(region.len(), 40);
    assert_eq!(region[0], 5.0);
    assert_eq!(region[19], 24.0);
    assert_eq!(region[20], 30.0);
    assert_eq!(region[39], 49.0);
}

#[test]
fn test_noise_fallbacks() {
    assert_eq!(quality::estimate_noise(&[0.0, 0.0], &[], 500.0), 5.0);
    assert_eq!(quality::estimate_noise(&[0.0, 0.0], &[], 50.0), 1.0);

    // Constant region: std is 0, so 1% of the mean wins
    assert_eq!(quality::estimate_noise(&[], &[200.0, 200.0], 0.0), 2.0);
}

#[test]
fn test_symmetry_score() {
    let symmetric = [1.0, 5.0, 10.0, 5.0, 1.0];
    assert_eq!(quality::symmetry_score(&symmetric, 2), 1.0);

    let short = [1.0, 10.0, 2.0, 1.0];
    assert!((quality::symmetry_score(&short, 1) - 2.0 / 3.0).abs() < 1e-12);

    // Apex on the left edge: tailing term is 0
    let edge = [10.0, 5.0, 2.0, 1.0, 1.0];
    assert_eq!(quality::symmetry_score(&edge, 0), 0.0);
}

#[test]
fn test_baseline_stability() {
    assert_eq!(quality::baseline_stability(&[]), 1.0);
    assert_eq!(quality::baseline_stability(&[7.0]), 1.0);
    assert_eq!(quality::baseline_stability(&[4.0, 4.0]), 1.0);
    assert_eq!(quality::baseline_stability(&[0.0, 0.0, 0.0, 100.0]), 0.0);
}

#[test]
fn test_lc_peak_table() {
    let times: Vec<f64> = (0..500).map(|i| i as f64 * 0.02).collect();
    let values: Vec<f64> = times
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let wiggle = if i % 2 == 0 { -0.5 } else { 0.5 };
            gaussian(t, 2.0, 0.05, 300.0)
                + gaussian(t, 5.0, 0.05, 150.0)
                + gaussian(t, 8.0, 0.05, 80.0)
                + wiggle
        })
        .collect();
    let corrected = Trace::new(times, values).unwrap();

    let table = detect_lc_peaks(&corrected, &IntegrationConfig::lc());
    assert_eq!(table.len(), 3);
    let numbers: Vec<usize> = table.peaks().iter().map(|p| p.peak_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    let first = &table.peaks()[0];
    assert!((first.peak_rt - 2.0).abs() < 1e-9);
    assert!(first.record.start_time < 2.0 && 2.0 < first.record.end_time);
    assert_eq!(first.record.total_area, first.record.baseline_corrected_area);

    let matched = table.peak_at_rt(5.15, DEFAULT_RT_TOLERANCE).unwrap();
    assert_eq!(matched.peak_number, 2);
    assert!(table.peak_at_rt(6.5, DEFAULT_RT_TOLERANCE).is_none());
}

#[test]
fn test_lc_prominence_threshold_floor() {
    let flat = vec![0.0; 50];
    assert_eq!(lc_prominence_threshold(&flat), 5.0);
}

#[test]
fn test_record_json_tags() {
    let json = serde_json::to_string(&PeakRecord::none()).unwrap();
    assert!(json.contains("\"integration_method\":\"none\""));

    let parsed: IntegrationMethod = serde_json::from_str("\"trapezoidal\"").unwrap();
    assert_eq!(parsed, IntegrationMethod::Trapezoidal);
}
