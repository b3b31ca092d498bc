//! # Source Module
//!
//! Loading of measurements and run inputs. The quantitation core never
//! touches the filesystem; these adapters produce the in-memory scans,
//! chromatograms, compound lists and calibration maps it consumes.
//!
//! - [`ScanSource`] / [`ChromatogramSource`]: collaborator traits, with
//!   [`JsonScanFile`] (a JSON array of scans) and [`DelimitedChromatogram`]
//!   (time/absorbance text files) as file-backed implementations
//! - [`load_compounds`]: `{ "<name>": { "ions": [..], "info": [..] } }`
//! - [`load_calibration_map`]: file stem to concentration string, JSON or TOML
//! - [`load_batch`]: pair scan and chromatogram sources by name, recording
//!   unreadable files as failures instead of stopping

mod batch;
mod chromatogram;
mod compounds;
mod error;
mod scans;

pub use batch::{load_batch, LoadedBatch};
pub use chromatogram::{
    detect_delimiter, read_chromatogram, write_chromatogram, DelimitedChromatogram,
};
pub use compounds::{load_calibration_map, load_compounds, parse_calibration_map, parse_compounds};
pub use error::SourceError;
pub use scans::{write_scans, JsonScanFile};

use crate::trace::Trace;
use crate::xic::Scan;

/// Something that yields a measurement's MS scans
pub trait ScanSource {
    /// Measurement name (file stem)
    fn name(&self) -> String;

    /// All scans of the measurement, in any order
    fn read_scans(&self) -> Result<Vec<Scan>, SourceError>;
}

/// Something that yields a measurement's LC chromatogram
pub trait ChromatogramSource {
    /// Measurement name (file stem)
    fn name(&self) -> String;

    /// The raw absorbance trace
    fn read_chromatogram(&self) -> Result<Trace, SourceError>;
}

#[cfg(test)]
mod tests;
