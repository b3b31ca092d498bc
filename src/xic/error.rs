use crate::trace::TraceError;

/// Errors raised while building an m/z axis or extracting ion chromatograms
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum XicError {
    /// A scan's m/z and intensity arrays differ in length
    #[error("Scan {scan}: m/z array has {mz_len} elements, intensity array has {intensity_len}")]
    ScanArrayMismatch {
        /// Position of the scan in the input sequence
        scan: usize,
        /// Length of the m/z array
        mz_len: usize,
        /// Length of the intensity array
        intensity_len: usize,
    },

    /// A scan's m/z array is not sorted ascending
    #[error("Scan {scan}: m/z array is not sorted at index {index}")]
    UnsortedMz {
        /// Position of the scan in the input sequence
        scan: usize,
        /// First out-of-order index
        index: usize,
    },

    /// A scan carries a NaN or infinite retention time, m/z or intensity
    #[error("Scan {scan}: non-finite value")]
    NonFiniteScan {
        /// Position of the scan in the input sequence
        scan: usize,
    },

    /// Two full scans share the same retention time
    #[error("Duplicate retention time {0} among full scans")]
    DuplicateRetentionTime(f64),

    /// No full scans were supplied where at least one is required
    #[error("No MS{0} scans available")]
    NoScans(u8),

    /// A scan used for axis construction declares no m/z limits
    #[error("Scan does not declare lower/upper m/z limits")]
    MissingMzLimits,

    /// Axis step is zero, negative or not finite
    #[error("Invalid m/z axis step: {0}")]
    InvalidStep(f64),

    /// Axis bounds are empty or inverted
    #[error("Invalid m/z bounds: low {low} >= high {high}")]
    InvalidBounds {
        /// Lower bound after padding
        low: f64,
        /// Upper bound after padding
        high: f64,
    },

    /// The requested axis would exceed the point cap
    #[error("m/z axis would contain {points} points (maximum {max})")]
    AxisTooLarge {
        /// Requested number of points
        points: u64,
        /// Allowed maximum
        max: u64,
    },

    /// Mass tolerance is negative or not finite
    #[error("Invalid mass tolerance: {0}")]
    InvalidTolerance(f64),

    /// The assembled trace failed validation
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),
}
