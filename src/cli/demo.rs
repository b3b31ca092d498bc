use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

use lcquant::source::{write_chromatogram, write_scans};
use lcquant::stats::linspace;
use lcquant::trace::Trace;
use lcquant::xic::Scan;

/// Demo analytes: name, ion m/z, ion label, MS response per mM
const ANALYTES: &[(&str, f64, &str, f64)] = &[
    ("Alanine", 90.055, "[M+H]+", 20_000.0),
    ("Valine", 118.086, "[M+H]+", 8_000.0),
];

/// Demo measurements: file stem and concentration in mM
const SERIES: &[(&str, f64)] = &[
    ("STMIX_0.5mM", 0.5),
    ("STMIX_1mM", 1.0),
    ("STMIX_2mM", 2.0),
    ("STMIX_4mM", 4.0),
    ("sample_01", 3.0),
];

const ELUTION_RT: f64 = 5.0;

/// Write a synthetic calibration series under `output`
pub fn run(output: PathBuf) -> Result<()> {
    info!("lcquant demo - synthetic calibration series");

    let ms_dir = output.join("ms");
    let lc_dir = output.join("lc");
    for dir in [&ms_dir, &lc_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    for &(stem, concentration) in SERIES {
        let scans_path = ms_dir.join(format!("{}.json", stem));
        write_scans(&mock_scans(concentration), &scans_path)
            .with_context(|| format!("Failed to write {}", scans_path.display()))?;

        let lc_path = lc_dir.join(format!("{}.csv", stem));
        write_chromatogram(&mock_chromatogram(concentration)?, &lc_path)
            .with_context(|| format!("Failed to write {}", lc_path.display()))?;
        info!("  {} ({} mM)", stem, concentration);
    }

    let compounds: serde_json::Map<String, serde_json::Value> = ANALYTES
        .iter()
        .map(|&(name, mz, label, _)| {
            (
                name.to_string(),
                serde_json::json!({ "ions": [mz], "info": [label] }),
            )
        })
        .collect();
    let compounds_path = output.join("compounds.json");
    fs::write(&compounds_path, serde_json::to_string_pretty(&compounds)?)
        .with_context(|| format!("Failed to write {}", compounds_path.display()))?;

    let calibration: String = SERIES
        .iter()
        .filter(|(stem, _)| stem.starts_with("STMIX"))
        .map(|(stem, c)| format!("\"{}\" = \"{} mM\"\n", stem, c))
        .collect();
    let calibration_path = output.join("calibration.toml");
    fs::write(&calibration_path, calibration)
        .with_context(|| format!("Failed to write {}", calibration_path.display()))?;

    println!("Demo series written to {}", output.display());
    println!(
        "  {} measurements, {} compounds",
        SERIES.len(),
        ANALYTES.len()
    );
    Ok(())
}

fn gaussian(t: f64, mu: f64, sigma: f64) -> f64 {
    (-(t - mu).powi(2) / (2.0 * sigma * sigma)).exp()
}

/// 100 MS1 scans over 10 minutes: a constant matrix ion plus every analyte
/// on a 1000 cps background
fn mock_scans(concentration: f64) -> Vec<Scan> {
    linspace(0.0, 10.0, 100)
        .into_iter()
        .map(|rt| {
            let g = gaussian(rt, ELUTION_RT, 0.5);
            let mut mz = vec![74.0];
            let mut intensity = vec![500.0];
            for &(_, ion, _, response) in ANALYTES {
                mz.push(ion);
                intensity.push(1000.0 + concentration * response * g);
            }
            Scan::ms1(rt, mz, intensity)
        })
        .collect()
}

/// Absorbance on a sloped baseline with one narrow peak
fn mock_chromatogram(concentration: f64) -> Result<Trace> {
    let times = linspace(0.0, 10.0, 500);
    let values = times
        .iter()
        .map(|&t| 10.0 + 0.5 * t + 300.0 * concentration * gaussian(t, ELUTION_RT, 0.05))
        .collect();
    Trace::new(times, values).context("Invalid demo chromatogram")
}
