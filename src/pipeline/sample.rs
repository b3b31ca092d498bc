use std::collections::BTreeMap;

use crate::baseline::BaselineCorrectionResult;
use crate::calibration::CalibrationCurve;
use crate::compound::CompoundResult;
use crate::measurement;
use crate::peak::LcPeakTable;
use crate::trace::Trace;
use crate::xic::Scan;

use super::UnitFailure;

/// One measurement handed to the pipeline: its MS scans and, optionally,
/// the matching LC chromatogram
#[derive(Debug, Clone, PartialEq)]
pub struct SampleInput {
    /// File stem identifying the measurement
    pub name: String,
    /// MS scans in any order
    pub scans: Vec<Scan>,
    /// Raw LC absorbance trace
    pub chromatogram: Option<Trace>,
}

impl SampleInput {
    /// Input without an LC trace
    pub fn new(name: impl Into<String>, scans: Vec<Scan>) -> Self {
        Self {
            name: name.into(),
            scans,
            chromatogram: None,
        }
    }

    /// Attach the LC chromatogram
    pub fn with_chromatogram(mut self, chromatogram: Trace) -> Self {
        self.chromatogram = Some(chromatogram);
        self
    }
}

/// Baseline correction and peak table of one LC trace
#[derive(Debug, Clone, PartialEq)]
pub struct LcAnalysis {
    /// Corrected trace with its baseline
    pub correction: BaselineCorrectionResult,
    /// Peaks found in the corrected trace
    pub peaks: LcPeakTable,
}

/// Everything computed for one measurement
#[derive(Debug, Clone, PartialEq)]
pub struct SampleResult {
    /// File stem
    pub name: String,
    /// Per-compound results in configuration order
    pub compounds: Vec<CompoundResult>,
    /// LC analysis when a chromatogram was supplied
    pub lc: Option<LcAnalysis>,
}

impl SampleResult {
    /// Result for the compound called `name`
    pub fn compound(&self, name: &str) -> Option<&CompoundResult> {
        self.compounds.iter().find(|c| c.name == name)
    }

    /// Whether the file name marks a calibration standard
    pub fn is_calibration_standard(&self) -> bool {
        measurement::is_calibration_standard(&self.name)
    }
}

/// Result of a full run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Successfully processed samples, in input order
    pub samples: Vec<SampleResult>,
    /// Fitted curves by compound name
    pub curves: BTreeMap<String, CalibrationCurve>,
    /// Files and compounds that failed
    pub failures: Vec<UnitFailure>,
    /// Files not processed because the run was cancelled
    pub skipped: Vec<String>,
    /// Whether cancellation was requested during the run
    pub cancelled: bool,
}

/// Result of calibrating a set of processed samples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationOutcome {
    /// Fitted curves by compound name
    pub curves: BTreeMap<String, CalibrationCurve>,
    /// Standards and compounds that could not be used
    pub failures: Vec<UnitFailure>,
}
