use super::*;
use crate::compound::{Compound, IonResult};
use crate::peak::PeakRecord;
use crate::trace::Trace;
use crate::xic::{MzWindow, Xic};

fn ion(area: f64, intensities: &[f64]) -> IonResult {
    let times: Vec<f64> = (0..intensities.len()).map(|i| i as f64 * 0.1).collect();
    IonResult {
        label: "ion".to_string(),
        xic: Xic {
            target_mz: 100.0,
            window: MzWindow {
                lower: 99.9997,
                upper: 100.0003,
            },
            trace: Trace::new(times, intensities.to_vec()).unwrap(),
            representative_rt: None,
        },
        ms_peak: PeakRecord {
            baseline_corrected_area: area,
            ..PeakRecord::default()
        },
        lc_intensity: None,
        lc_peak: None,
    }
}

fn point(concentration: f64, peak_area: f64, intensity_sum: f64) -> CalibrationPoint {
    CalibrationPoint {
        concentration,
        peak_area_signal: peak_area,
        intensity_sum_signal: intensity_sum,
    }
}

#[test]
fn test_round_trip_recovers_concentrations() {
    let concentrations = [0.5, 1.0, 2.0, 5.0, 10.0];
    let builder = concentrations.iter().fold(CalibrationBuilder::new("Alanine"), |b, &c| {
        b.add_point(point(c, 250.0 * c + 10.0, 0.0))
    });
    let curve = builder.finish(&CalibrationConfig::default()).unwrap();

    assert!(curve.use_peak_area());
    assert!((curve.parameters().r_squared - 1.0).abs() < 1e-12);
    for &c in &concentrations {
        let back = curve.concentration_for(250.0 * c + 10.0);
        assert!((back - c).abs() < 1e-6, "{} vs {}", back, c);
    }
}

#[test]
fn test_poor_peak_area_fit_switches_to_intensity_sum() {
    let compound = Compound::new("Serine", &[106.05]);
    let peak_areas = [500.0, 100.0, 450.0, 120.0, 480.0];
    let ions: Vec<Vec<IonResult>> = peak_areas
        .iter()
        .enumerate()
        .map(|(i, &area)| {
            let c = (i + 1) as f64;
            vec![ion(area, &[1000.0 * c, 50.0])]
        })
        .collect();
    let samples: Vec<CalibrationSample<'_>> = ions
        .iter()
        .enumerate()
        .map(|(i, ions)| CalibrationSample {
            concentration: (i + 1) as f64,
            ions,
        })
        .collect();

    let engine = CalibrationEngine::default();
    let curve = engine.build_curve(&compound, &samples).unwrap();
    let params = curve.parameters();

    assert!(!params.use_peak_area);
    assert_eq!(params.signal_method(), SignalMethod::IntensitySum);
    assert!(params.r_squared >= 0.95);
    assert!((params.slope - 1000.0).abs() < 1e-9);

    // A large peak area must not influence the unknown's concentration
    let unknown = vec![ion(999_999.0, &[3000.0, 50.0])];
    assert_eq!(engine.quantify(&curve, &unknown), 3.0);
    assert_eq!(curve.points()[0], (1.0, 1050.0));
}

#[test]
fn test_good_peak_area_fit_is_kept() {
    let builder = CalibrationBuilder::new("Valine")
        .add_point(point(1.0, 100.0, 7.0))
        .add_point(point(2.0, 210.0, 3.0))
        .add_point(point(3.0, 290.0, 9.0));
    let curve = builder.finish(&CalibrationConfig::default()).unwrap();
    assert!(curve.use_peak_area());
    assert_eq!(curve.points()[1], (2.0, 210.0));
}

#[test]
fn test_concentration_never_negative_or_nan() {
    let params = CalibrationParameters {
        slope: 250.0,
        intercept: 10.0,
        r_value: 1.0,
        r_squared: 1.0,
        p_value: 0.0,
        std_err: 0.0,
        use_peak_area: true,
    };
    assert_eq!(params.concentration_for(0.0), 0.0);
    assert!(params.concentration_for(0.0).is_sign_positive());
    assert_eq!(params.concentration_for(f64::NAN), 0.0);
    assert_eq!(params.concentration_for(510.0), 2.0);

    let flat = CalibrationParameters {
        slope: 0.0,
        ..params
    };
    assert_eq!(flat.concentration_for(10.0), 0.0);
    assert_eq!(flat.concentration_for(20.0), 0.0);
}

#[test]
fn test_concentration_rounded_to_six_decimals() {
    let params = CalibrationParameters {
        slope: 3.0,
        intercept: 0.0,
        r_value: 1.0,
        r_squared: 1.0,
        p_value: 0.0,
        std_err: 0.0,
        use_peak_area: true,
    };
    assert_eq!(params.concentration_for(1.0), 0.333333);
}

#[test]
fn test_too_few_points() {
    let err = CalibrationBuilder::new("Leucine")
        .add_point(point(1.0, 10.0, 10.0))
        .finish(&CalibrationConfig::default())
        .unwrap_err();
    assert_eq!(
        err,
        CalibrationError::TooFewPoints {
            compound: "Leucine".to_string(),
            got: 1
        }
    );
}

#[test]
fn test_duplicate_concentration_overwrites() {
    let builder = CalibrationBuilder::new("Proline")
        .add_point(point(1.0, 10.0, 10.0))
        .add_point(point(1.0, 20.0, 20.0));
    assert_eq!(builder.len(), 1);
    assert_eq!(builder.points()[0].peak_area_signal, 20.0);
    assert!(matches!(
        builder.finish(&CalibrationConfig::default()),
        Err(CalibrationError::TooFewPoints { got: 1, .. })
    ));
}

#[test]
fn test_merge_keeps_later_points() {
    let a = CalibrationBuilder::new("Lysine")
        .add_point(point(1.0, 10.0, 0.0))
        .add_point(point(2.0, 20.0, 0.0));
    let b = CalibrationBuilder::new("Lysine").add_point(point(2.0, 25.0, 0.0));
    let merged = a.merge(b);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged.points()[1].peak_area_signal, 25.0);
}

#[test]
fn test_flat_signals_are_degenerate() {
    let err = CalibrationBuilder::new("Histidine")
        .add_point(point(1.0, 5.0, 5.0))
        .add_point(point(2.0, 5.0, 5.0))
        .finish(&CalibrationConfig::default())
        .unwrap_err();
    assert!(matches!(err, CalibrationError::DegenerateSlope { .. }));
}

#[test]
fn test_poor_fallback_fit_rejected() {
    let config = CalibrationConfig {
        min_fallback_r_squared: 0.9,
        ..CalibrationConfig::default()
    };
    let err = CalibrationBuilder::new("Arginine")
        .add_point(point(1.0, 5.0, 5.0))
        .add_point(point(2.0, 1.0, 1.0))
        .add_point(point(3.0, 5.0, 5.0))
        .finish(&config)
        .unwrap_err();
    assert!(matches!(err, CalibrationError::PoorFit { .. }));
}

#[test]
fn test_compound_without_ions() {
    let engine = CalibrationEngine::default();
    let err = engine
        .build_curve(&Compound::new("Empty", &[]), &[])
        .unwrap_err();
    assert_eq!(err, CalibrationError::NoIons("Empty".to_string()));
}

#[test]
fn test_ion_signal_fallback() {
    let with_area = ion(120.0, &[1.4, 2.3]);
    let without_area = ion(0.0, &[1.4, 2.3]);

    assert_eq!(ion_signal(&with_area, SignalMethod::PeakArea), (120.0, true));
    assert_eq!(ion_signal(&without_area, SignalMethod::PeakArea), (4.0, false));
    assert_eq!(
        ion_signal(&with_area, SignalMethod::IntensitySum),
        (4.0, false)
    );

    let signal = compound_signal(&[with_area, without_area], SignalMethod::PeakArea);
    assert_eq!(signal.value, 124.0);
    assert!(signal.peak_area_used);
}

#[test]
fn test_apply_curve_matches_curve() {
    let curve = CalibrationBuilder::new("Threonine")
        .add_point(point(1.0, 10.0, 0.0))
        .add_point(point(3.0, 30.0, 0.0))
        .finish(&CalibrationConfig::default())
        .unwrap();
    let engine = CalibrationEngine::default();
    assert_eq!(engine.apply_curve(&curve, 20.0), 2.0);
}
