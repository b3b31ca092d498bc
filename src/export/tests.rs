use super::*;
use crate::calibration::CalibrationParameters;
use crate::compound::{CompoundResult, IonResult};
use crate::peak::{IntegrationMethod, LcPeak, PeakRecord};
use crate::trace::Trace;
use crate::xic::{MzWindow, Xic};

fn ion(label: &str, lc_peak: Option<LcPeak>) -> IonResult {
    IonResult {
        label: label.to_string(),
        xic: Xic {
            target_mz: 90.055,
            window: MzWindow {
                lower: 90.0547,
                upper: 90.0553,
            },
            trace: Trace::new(vec![4.0, 4.1234, 4.3], vec![10.4, 250.2, 30.1]).unwrap(),
            representative_rt: Some(4.1234),
        },
        ms_peak: PeakRecord {
            total_area: 40.0,
            baseline_corrected_area: 25.0,
            integration_method: IntegrationMethod::Trapezoidal,
            ..PeakRecord::default()
        },
        lc_intensity: None,
        lc_peak,
    }
}

fn result() -> CompoundResult {
    let lc_peak = LcPeak {
        peak_number: 2,
        peak_rt: 4.15,
        record: PeakRecord {
            total_area: 12.5,
            baseline_corrected_area: 12.5,
            integration_method: IntegrationMethod::Trapezoidal,
            ..PeakRecord::default()
        },
    };
    let mut result = CompoundResult::new(
        "Alanine",
        "STMIX_1mM",
        vec![ion(" [M+H]+ ", Some(lc_peak)), ion("90.055", None)],
    );
    result.concentration = Some(1.25);
    result.calibration = Some(CalibrationParameters {
        slope: 20.0,
        intercept: 0.5,
        r_value: 0.99,
        r_squared: 0.9801,
        p_value: 0.001,
        std_err: 0.2,
        use_peak_area: true,
    });
    result
}

#[test]
fn test_row_fields() {
    let rows = ResultRow::from_compound(&result());
    assert_eq!(rows.len(), 2);

    let row = &rows[0];
    assert_eq!(row.file, "STMIX_1mM");
    assert_eq!(row.ion_mz, 90.055);
    assert_eq!(row.rt, 4.123);
    assert_eq!(row.ms_intensity, 291.0);
    assert_eq!(row.ion_name, "[M+H]+");
    assert_eq!(row.ms_method, "trapezoidal");
    assert_eq!(row.lc_total_area, 12.5);
    assert_eq!(row.lc_method, "trapezoidal");
    assert_eq!(row.concentration, 1.25);
    assert_eq!(row.calibration_r2, 0.9801);
}

#[test]
fn test_missing_values_default_to_zero_and_none() {
    let mut uncalibrated = result();
    uncalibrated.concentration = None;
    uncalibrated.calibration = None;
    let row = &ResultRow::from_compound(&uncalibrated)[1];

    assert_eq!(row.lc_intensity, 0.0);
    assert_eq!(row.lc_total_area, 0.0);
    assert_eq!(row.lc_method, "none");
    assert_eq!(row.concentration, 0.0);
    assert_eq!(row.calibration_slope, 0.0);
    assert_eq!(row.calibration_intercept, 0.0);
}

#[test]
fn test_csv_header_and_records() {
    let rows = ResultRow::from_compound(&result());
    let mut buffer = Vec::new();
    write_csv(&rows, &mut buffer).unwrap();

    let text = String::from_utf8(buffer).unwrap();
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("File,Ion (m/z),Compound,RT (min),MS Intensity (cps)"));
    assert!(header.ends_with("Calibration slope,Calibration intercept,Calibration R2"));
    assert_eq!(text.lines().count(), 3);

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let parsed: Vec<ResultRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
    assert_eq!(parsed[1].ion_name, "90.055");
    assert_eq!(parsed[1].lc_method, "none");
}

#[test]
fn test_json_keys() {
    let rows = ResultRow::from_compound(&result());
    let mut buffer = Vec::new();
    write_json(&rows, &mut buffer).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
    let first = &value[0];
    assert_eq!(first["Compound"], "Alanine");
    assert_eq!(first["Concentration (mM)"], 1.25);
    assert_eq!(first["LC Integration Method"], "trapezoidal");
}

#[test]
fn test_write_results_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    write_results(&ResultRow::from_compound(&result()), &path, false).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("File,"));
}

#[test]
fn test_run_summary() {
    use crate::pipeline::{BatchOutcome, PipelineError, UnitFailure};

    let outcome = BatchOutcome {
        failures: vec![UnitFailure {
            unit: "Alanine".to_string(),
            error: PipelineError::NoCompounds,
        }],
        skipped: vec!["late_file".to_string()],
        ..BatchOutcome::default()
    };
    let summary = RunSummary::from_outcome(&outcome);
    assert_eq!(summary.samples, 0);
    assert_eq!(summary.failures[0].error, "No compounds configured");

    let json = summary.to_json().unwrap();
    let parsed: RunSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.skipped, vec!["late_file".to_string()]);
    assert_eq!(parsed.version, env!("CARGO_PKG_VERSION"));
}
