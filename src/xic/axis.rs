use log::debug;

use super::{Scan, XicError};
use crate::stats;

/// Default axis spacing in m/z
pub const DEFAULT_MZ_STEP: f64 = 0.0001;

/// Hard cap on the number of axis points
pub const MAX_AXIS_POINTS: u64 = 50_000_000;

/// Builds a uniformly sampled m/z axis from declared instrument bounds
#[derive(Debug, Clone, PartialEq)]
pub struct MzAxisBuilder {
    step: f64,
    padding: f64,
}

impl Default for MzAxisBuilder {
    fn default() -> Self {
        Self {
            step: DEFAULT_MZ_STEP,
            padding: 0.0,
        }
    }
}

impl MzAxisBuilder {
    /// Builder with the default step and no padding
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the axis spacing
    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Widen both bounds by `padding` m/z
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Build the axis covering `[low - padding, high + padding]`.
    ///
    /// Points are spaced exactly `step` apart (the last point is `high`
    /// when the span is a multiple of the step) and rounded to the number of
    /// decimals in `step`.
    pub fn build(&self, low: f64, high: f64) -> Result<Vec<f64>, XicError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(XicError::InvalidStep(self.step));
        }
        let low = low - self.padding;
        let high = high + self.padding;
        if !low.is_finite() || !high.is_finite() || high <= low {
            return Err(XicError::InvalidBounds { low, high });
        }

        let intervals = ((high - low) / self.step).round();
        let points = intervals + 1.0;
        if !points.is_finite() || points > MAX_AXIS_POINTS as f64 {
            return Err(XicError::AxisTooLarge {
                points: if points.is_finite() { points as u64 } else { u64::MAX },
                max: MAX_AXIS_POINTS,
            });
        }
        let n = points as usize;
        let decimals = step_decimals(self.step);

        debug!(
            "Building m/z axis [{}, {}] with step {} ({} points)",
            low, high, self.step, n
        );

        let end = low + intervals * self.step;
        Ok(stats::linspace(low, end, n)
            .into_iter()
            .map(|v| stats::round_to(v, decimals))
            .collect())
    }

    /// Build the axis from a scan's declared lower/upper m/z limits
    pub fn build_from_scan(&self, scan: &Scan) -> Result<Vec<f64>, XicError> {
        match (scan.lower_mz_limit, scan.upper_mz_limit) {
            (Some(low), Some(high)) => self.build(low, high),
            _ => Err(XicError::MissingMzLimits),
        }
    }
}

/// Number of decimal places in the shortest representation of `step`
fn step_decimals(step: f64) -> u32 {
    let repr = step.to_string();
    match repr.split_once('.') {
        Some((_, frac)) => frac.len() as u32,
        None => 0,
    }
}
