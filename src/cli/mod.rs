use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod baseline;
mod config;
mod demo;
mod quantify;

pub use quantify::QuantifyArgs;

/// lcquant - LC-MS quantitation from scans, LC traces and calibration standards
#[derive(Parser)]
#[command(name = "lcquant")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate, calibrate and quantify a batch of measurements
    Quantify(QuantifyArgs),

    /// Baseline-correct a single LC trace
    Baseline {
        /// Delimited LC trace (time, value)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Corrected trace output (defaults to <INPUT>_corrected.csv)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Generate a synthetic calibration series for testing
    Demo {
        /// Output directory
        #[arg(value_name = "DIR", default_value = "lcquant_demo")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Quantify(args) => quantify::run(args),
        Commands::Baseline { input, output } => baseline::run(input, output),
        Commands::Demo { output } => demo::run(output),
    }
}
