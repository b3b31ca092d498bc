use log::warn;
use serde::{Deserialize, Serialize};

use super::XicError;
use crate::trace::Trace;

/// One instrument acquisition as delivered by a scan source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    /// MS level (1 = full scan)
    #[serde(default = "default_ms_level")]
    pub ms_level: u8,

    /// Scan start time in minutes
    pub retention_time: f64,

    /// m/z values, ascending
    pub mz_array: Vec<f64>,

    /// Intensities parallel to `mz_array`
    pub intensity_array: Vec<f64>,

    /// Declared lower scan window limit (instrument metadata)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_mz_limit: Option<f64>,

    /// Declared upper scan window limit (instrument metadata)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_mz_limit: Option<f64>,
}

fn default_ms_level() -> u8 {
    1
}

impl Scan {
    /// Create a full (MS1) scan without declared limits
    pub fn ms1(retention_time: f64, mz_array: Vec<f64>, intensity_array: Vec<f64>) -> Self {
        Self {
            ms_level: 1,
            retention_time,
            mz_array,
            intensity_array,
            lower_mz_limit: None,
            upper_mz_limit: None,
        }
    }

    /// Set the declared m/z scan window
    pub fn with_mz_limits(mut self, lower: f64, upper: f64) -> Self {
        self.lower_mz_limit = Some(lower);
        self.upper_mz_limit = Some(upper);
        self
    }

    /// Number of data points
    pub fn peak_count(&self) -> usize {
        self.mz_array.len()
    }

    /// Check array shape, ordering and finiteness. `position` is used for
    /// error reporting only.
    pub fn validate(&self, position: usize) -> Result<(), XicError> {
        if self.mz_array.len() != self.intensity_array.len() {
            return Err(XicError::ScanArrayMismatch {
                scan: position,
                mz_len: self.mz_array.len(),
                intensity_len: self.intensity_array.len(),
            });
        }
        if !self.retention_time.is_finite()
            || self.mz_array.iter().any(|v| !v.is_finite())
            || self.intensity_array.iter().any(|v| !v.is_finite())
        {
            return Err(XicError::NonFiniteScan { scan: position });
        }
        if let Some(index) = self.mz_array.windows(2).position(|w| w[1] < w[0]) {
            return Err(XicError::UnsortedMz {
                scan: position,
                index: index + 1,
            });
        }
        Ok(())
    }
}

/// Mass-accuracy tolerance for matching an observed m/z to a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value")]
pub enum MassTolerance {
    /// Fixed half-width in Da
    #[serde(rename = "da")]
    Absolute(f64),
    /// Half-width in parts per million of the target m/z
    #[serde(rename = "ppm")]
    Ppm(f64),
}

impl Default for MassTolerance {
    /// Three times a 0.0001 Da mass accuracy
    fn default() -> Self {
        MassTolerance::Absolute(3.0 * 0.0001)
    }
}

impl MassTolerance {
    /// Half-width of the window around `mz`
    pub fn half_width(&self, mz: f64) -> f64 {
        match *self {
            MassTolerance::Absolute(da) => da,
            MassTolerance::Ppm(ppm) => mz * ppm * 1e-6,
        }
    }

    /// Reject negative or non-finite tolerances
    pub fn validate(&self) -> Result<(), XicError> {
        let raw = match *self {
            MassTolerance::Absolute(v) | MassTolerance::Ppm(v) => v,
        };
        if raw.is_finite() && raw >= 0.0 {
            Ok(())
        } else {
            Err(XicError::InvalidTolerance(raw))
        }
    }

    /// Resolve the matching window for `mz`, clamping the lower bound at 0
    pub fn window(&self, mz: f64) -> MzWindow {
        let d = self.half_width(mz);
        let mut lower = mz - d;
        if lower < 0.0 {
            warn!(
                "Mass range for ion {} starts below 0, clamping lower bound to 0",
                mz
            );
            lower = 0.0;
        }
        MzWindow {
            lower,
            upper: mz + d,
        }
    }
}

/// Closed m/z interval `[lower, upper]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MzWindow {
    /// Inclusive lower bound
    pub lower: f64,
    /// Inclusive upper bound
    pub upper: f64,
}

impl MzWindow {
    /// Whether `mz` falls inside the window
    pub fn contains(&self, mz: f64) -> bool {
        mz >= self.lower && mz <= self.upper
    }

    /// Index range of `sorted` whose values fall inside the window
    pub fn index_range(&self, sorted: &[f64]) -> std::ops::Range<usize> {
        let start = sorted.partition_point(|&m| m < self.lower);
        let end = sorted.partition_point(|&m| m <= self.upper);
        start..end.max(start)
    }
}

/// A single m/z of interest with its matching tolerance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IonTarget {
    /// Target m/z
    pub mz: f64,

    /// Tolerance used when no custom range is set
    #[serde(default)]
    pub tolerance: MassTolerance,

    /// Override window `(lower, upper)`, replacing the tolerance entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_range: Option<(f64, f64)>,
}

impl IonTarget {
    /// Target with the default tolerance
    pub fn new(mz: f64) -> Self {
        Self {
            mz,
            tolerance: MassTolerance::default(),
            custom_range: None,
        }
    }

    /// Replace the tolerance
    pub fn with_tolerance(mut self, tolerance: MassTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set an explicit matching window
    pub fn with_custom_range(mut self, lower: f64, upper: f64) -> Self {
        self.custom_range = Some((lower, upper));
        self
    }

    /// Effective matching window
    pub fn window(&self) -> MzWindow {
        match self.custom_range {
            Some((lower, upper)) => MzWindow {
                lower: lower.max(0.0),
                upper,
            },
            None => self.tolerance.window(self.mz),
        }
    }
}

/// Extracted-ion chromatogram for one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Xic {
    /// Target m/z the trace was extracted for
    pub target_mz: f64,

    /// Window used for matching
    pub window: MzWindow,

    /// Matched `(retention_time, intensity)` samples; scans without a match are absent
    pub trace: Trace,

    /// Retention time of the most intense matched scan
    pub representative_rt: Option<f64>,
}

impl Xic {
    /// Sum of matched intensities
    pub fn intensity_sum(&self) -> f64 {
        self.trace.value_sum()
    }

    /// Whether no scan matched
    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }
}
