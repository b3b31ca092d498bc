use crate::calibration::CalibrationError;
use crate::trace::TraceError;
use crate::xic::XicError;

/// Errors raised by the batch pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// The pipeline was created without any compound
    #[error("No compounds configured")]
    NoCompounds,

    /// Two compounds share a name
    #[error("Duplicate compound name: {0}")]
    DuplicateCompound(String),

    /// A calibration concentration names a file that was not processed
    #[error("No results found for file {0}")]
    MissingSample(String),

    /// A measurement file could not be read
    #[error("Failed to read input: {0}")]
    Input(String),

    /// The batch was cancelled before this unit ran
    #[error("Cancelled before processing {0}")]
    Cancelled(String),

    /// Scan data could not be turned into chromatograms
    #[error("XIC extraction failed: {0}")]
    Xic(#[from] XicError),

    /// A chromatogram was malformed
    #[error("Invalid chromatogram: {0}")]
    Trace(#[from] TraceError),

    /// A calibration input or fit failed
    #[error("Calibration failed: {0}")]
    Calibration(#[from] CalibrationError),
}

/// A unit of work (file or compound) that failed without aborting the batch
#[derive(Debug, Clone, PartialEq)]
pub struct UnitFailure {
    /// File stem or compound name
    pub unit: String,
    /// What went wrong
    pub error: PipelineError,
}

impl UnitFailure {
    pub(crate) fn new(unit: impl Into<String>, error: impl Into<PipelineError>) -> Self {
        Self {
            unit: unit.into(),
            error: error.into(),
        }
    }
}
