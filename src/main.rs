//! # lcquant
//!
//! Command-line front end for the LC-MS quantitation pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Write a synthetic calibration series
//! lcquant demo demo_run
//!
//! # Quantify it
//! lcquant -v quantify --ms demo_run/ms/*.json --lc demo_run/lc/*.csv \
//!     --compounds demo_run/compounds.json --calibration demo_run/calibration.toml
//!
//! # Baseline-correct one LC trace
//! lcquant baseline demo_run/lc/STMIX_1mM.csv
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
