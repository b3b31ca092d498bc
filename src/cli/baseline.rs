use anyhow::{bail, Context, Result};
use log::info;
use std::path::PathBuf;

use lcquant::baseline::{BaselineConfig, BaselineCorrector};
use lcquant::measurement;
use lcquant::peak::{detect_lc_peaks, IntegrationConfig};
use lcquant::source::{write_chromatogram, ChromatogramSource, DelimitedChromatogram};

/// Baseline-correct one LC trace and report its peaks
pub fn run(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    if !input.exists() {
        bail!("File not found: {}", input.display());
    }

    let source = DelimitedChromatogram::new(&input);
    let trace = source
        .read_chromatogram()
        .with_context(|| format!("Failed to read LC trace: {}", input.display()))?;
    info!("Read {} samples from {}", trace.len(), input.display());

    let correction = BaselineCorrector::new(BaselineConfig::default())
        .correct(&trace)
        .context("Baseline correction failed")?;

    let output = output.unwrap_or_else(|| {
        let stem = measurement::file_stem(&input);
        input.with_file_name(format!("{}_corrected.csv", stem))
    });
    write_chromatogram(&correction.corrected, &output)
        .with_context(|| format!("Failed to write corrected trace: {}", output.display()))?;

    let peaks = detect_lc_peaks(&correction.corrected, &IntegrationConfig::lc());

    println!("Baseline shift: {}", correction.shift);
    println!("Peaks: {}", peaks.len());
    for peak in peaks.peaks() {
        println!(
            "  #{:<3} RT {:>8.3} min  area {:>12.3}  quality {:.2}",
            peak.peak_number,
            peak.peak_rt,
            peak.record.baseline_corrected_area,
            peak.record.quality_score
        );
    }
    println!("Corrected trace written to {}", output.display());
    Ok(())
}
