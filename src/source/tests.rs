use super::*;
use crate::xic::Scan;

#[test]
fn test_detect_delimiter() {
    assert_eq!(detect_delimiter("1.0,2.0"), Some(b','));
    assert_eq!(detect_delimiter("1.0\t2.0"), Some(b'\t'));
    assert_eq!(detect_delimiter("1.0 2.0"), Some(b' '));
    assert_eq!(detect_delimiter("12"), None);
}

#[test]
fn test_read_chromatogram_skips_non_numeric_rows() {
    let content = "Time (min)\tStep (s)\tValue (mAU)\n\
                   Injection\tSTMIX\n\
                   0.0\t0.6\t1.5\n\
                   0.01\t0.6\t2.5\n\
                   0.02\t0.6\t-0.5\n";
    let trace = read_chromatogram(content, "lc").unwrap();
    assert_eq!(trace.times(), &[0.0, 0.01, 0.02]);
    assert_eq!(trace.values(), &[1.5, 2.5, -0.5]);
}

#[test]
fn test_read_chromatogram_space_separated() {
    let trace = read_chromatogram("0.0   4.0\n0.5   6.0\n", "lc").unwrap();
    assert_eq!(trace.values(), &[4.0, 6.0]);
}

#[test]
fn test_read_chromatogram_errors() {
    assert!(matches!(
        read_chromatogram("nothing", "a"),
        Err(SourceError::NoDelimiter(_))
    ));
    assert!(matches!(
        read_chromatogram("a,b\nc,d\n", "b"),
        Err(SourceError::NoSamples(_))
    ));
    assert!(matches!(
        read_chromatogram("1.0,2.0\n0.5,3.0\n", "c"),
        Err(SourceError::InvalidTrace(_))
    ));
}

#[test]
fn test_chromatogram_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("STMIX_1mM.csv");
    let trace = crate::trace::Trace::new(vec![0.0, 0.1, 0.2], vec![1.0, 5.0, 2.0]).unwrap();
    write_chromatogram(&trace, &path).unwrap();

    let source = DelimitedChromatogram::new(&path);
    assert_eq!(source.name(), "STMIX_1mM");
    assert_eq!(source.read_chromatogram().unwrap(), trace);
}

#[test]
fn test_scan_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.json");
    std::fs::write(
        &path,
        r#"[{"retention_time": 0.5, "mz_array": [100.0], "intensity_array": [10.0]},
            {"ms_level": 2, "retention_time": 0.6, "mz_array": [], "intensity_array": []}]"#,
    )
    .unwrap();

    let source = JsonScanFile::new(&path);
    let scans = source.read_scans().unwrap();
    assert_eq!(source.name(), "sample");
    assert_eq!(scans[0], Scan::ms1(0.5, vec![100.0], vec![10.0]));
    assert_eq!(scans[1].ms_level, 2);
}

#[test]
fn test_compounds_keep_file_order() {
    let json = r#"{
        "Valine": {"ions": [118.086, 72.081], "info": ["[M+H]+", "fragment"]},
        "Alanine": {"ions": [90.055]}
    }"#;
    let compounds = parse_compounds(json).unwrap();
    assert_eq!(compounds.len(), 2);
    assert_eq!(compounds[0].name, "Valine");
    assert_eq!(compounds[0].targets.len(), 2);
    assert_eq!(compounds[0].ion_label(1), "fragment");
    assert_eq!(compounds[1].name, "Alanine");
    assert!(compounds[1].ion_info.is_empty());
}

#[test]
fn test_compounds_reject_bad_shape() {
    assert!(matches!(
        parse_compounds(r#"["Alanine"]"#),
        Err(SourceError::JsonError(_))
    ));
}

#[test]
fn test_calibration_map_formats() {
    let json = parse_calibration_map(r#"{"STMIX_1": "1 mM", "STMIX_2": "500 uM"}"#, false).unwrap();
    assert_eq!(json["STMIX_2"], "500 uM");

    let toml = parse_calibration_map("STMIX_1 = \"1 mM\"\n\"STMIX 2\" = \"2 mM\"\n", true).unwrap();
    assert_eq!(toml.len(), 2);
    assert_eq!(toml["STMIX 2"], "2 mM");
}

#[test]
fn test_calibration_map_keeps_file_order() {
    let json = parse_calibration_map(r#"{"STMIX_b": "1 mM", "STMIX_a": "1 mM"}"#, false).unwrap();
    let stems: Vec<&str> = json.iter().map(|(stem, _)| stem).collect();
    assert_eq!(stems, ["STMIX_b", "STMIX_a"]);

    let toml = parse_calibration_map("STMIX_b = \"1 mM\"\nSTMIX_a = \"1 mM\"\n", true).unwrap();
    let stems: Vec<&str> = toml.iter().map(|(stem, _)| stem).collect();
    assert_eq!(stems, ["STMIX_b", "STMIX_a"]);
}

#[test]
fn test_load_calibration_map_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calibration.toml");
    std::fs::write(&path, "STMIX_1 = \"1 mM\"\n").unwrap();
    assert_eq!(load_calibration_map(&path).unwrap()["STMIX_1"], "1 mM");
}
