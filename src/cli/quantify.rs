use anyhow::{bail, Context, Result};
use clap::Args;
use crossbeam_channel::Receiver;
use log::{info, warn};
use std::path::PathBuf;
use std::thread;

use lcquant::export::{write_results, ResultRow, RunSummary};
use lcquant::measurement;
use lcquant::pipeline::{BatchOutcome, Pipeline, PipelineConfig, ProgressEvent, SampleInput};
use lcquant::source::{
    load_batch, load_calibration_map, load_compounds, DelimitedChromatogram, JsonScanFile,
};

use super::config::Config;

/// Inputs and outputs of a quantitation run
#[derive(Args)]
pub struct QuantifyArgs {
    /// MS scan files (JSON arrays of scans)
    #[arg(long = "ms", value_name = "JSON", num_args = 1.., required = true)]
    ms: Vec<PathBuf>,

    /// LC traces, matched to scan files by file stem
    #[arg(long = "lc", value_name = "CSV", num_args = 1..)]
    lc: Vec<PathBuf>,

    /// Compound list (JSON)
    #[arg(long, value_name = "JSON")]
    compounds: PathBuf,

    /// File stem to concentration map (TOML or JSON); derived from
    /// STMIX file names when omitted
    #[arg(long, value_name = "FILE")]
    calibration: Option<PathBuf>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Result table path (defaults to results.csv, or results.json with --json)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Write results as JSON instead of CSV
    #[arg(long)]
    json: bool,

    /// Also write a JSON run summary (curves and failures)
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,
}

/// Run the full pipeline over the given files
pub fn run(args: QuantifyArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            info!("Using config file: {}", path.display());
            Config::from_file(path)?.apply(PipelineConfig::default())?
        }
        None => PipelineConfig::default(),
    };

    let compounds = load_compounds(&args.compounds)
        .with_context(|| format!("Failed to load compounds: {}", args.compounds.display()))?;
    info!("Loaded {} compounds", compounds.len());

    let loaded = load_batch(
        args.ms.iter().map(JsonScanFile::new).collect(),
        args.lc.iter().map(DelimitedChromatogram::new).collect(),
    );
    let inputs = loaded.inputs;
    let concentrations = match &args.calibration {
        Some(path) => load_calibration_map(path)
            .with_context(|| format!("Failed to load calibration map: {}", path.display()))?,
        None => measurement::calibration_map(inputs.iter().map(|i| i.name.as_str())),
    };
    if concentrations.is_empty() {
        warn!("No calibration standards found; results will not be quantified");
    }

    let (sender, receiver) = crossbeam_channel::unbounded();
    let reporter = thread::spawn(move || report_progress(receiver));

    let pipeline = Pipeline::new(config, compounds)?.with_progress(sender);
    let mut outcome = pipeline.run(&inputs, &concentrations);
    let mut failures = loaded.failures;
    failures.append(&mut outcome.failures);
    outcome.failures = failures;
    // Closes the channel so the reporter finishes
    drop(pipeline);
    if reporter.join().is_err() {
        warn!("Progress reporter panicked");
    }

    let output = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(if args.json { "results.json" } else { "results.csv" })
    });
    let rows = ResultRow::from_samples(&outcome.samples);
    write_results(&rows, &output, args.json)
        .with_context(|| format!("Failed to write results: {}", output.display()))?;

    if let Some(path) = &args.summary {
        RunSummary::from_outcome(&outcome)
            .write(path)
            .with_context(|| format!("Failed to write summary: {}", path.display()))?;
    }

    print_outcome(&outcome, &output);
    if outcome.samples.is_empty() {
        bail!("No sample could be processed");
    }
    Ok(())
}

fn report_progress(receiver: Receiver<ProgressEvent>) {
    for event in receiver {
        match event {
            ProgressEvent::FileProcessed {
                file,
                completed,
                total,
            } => info!("[{}/{}] {}", completed, total, file),
            ProgressEvent::FileFailed { file, message } => {
                eprintln!("{}", failure_line(&file, &message))
            }
            ProgressEvent::CompoundCalibrated {
                compound,
                r_squared,
            } => info!("Calibrated {} (R² = {:.4})", compound, r_squared),
            ProgressEvent::Cancelled => warn!("Run cancelled"),
        }
    }
}

fn print_outcome(outcome: &BatchOutcome, output: &std::path::Path) {
    println!(
        "Processed {} samples, {} calibration curves",
        outcome.samples.len(),
        outcome.curves.len()
    );
    for (compound, curve) in &outcome.curves {
        let params = curve.parameters();
        println!(
            "  {}: slope {:.4}, intercept {:.4}, R² {:.4} ({})",
            compound,
            params.slope,
            params.intercept,
            params.r_squared,
            params.signal_method()
        );
    }
    for failure in &outcome.failures {
        eprintln!("{}", failure_line(&failure.unit, &failure.error.to_string()));
    }
    if !outcome.skipped.is_empty() {
        println!("Skipped {} files", outcome.skipped.len());
    }
    println!("Results written to {}", output.display());
}

#[cfg(feature = "colorized_output")]
fn failure_line(unit: &str, message: &str) -> String {
    format!(
        "{} {}: {}",
        console::style("✗").red().bold(),
        console::style(unit).bold(),
        message
    )
}

#[cfg(not(feature = "colorized_output"))]
fn failure_line(unit: &str, message: &str) -> String {
    format!("FAILED {}: {}", unit, message)
}
