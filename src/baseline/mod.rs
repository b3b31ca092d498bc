//! # Baseline Correction Module
//!
//! Removes slowly varying background drift from an LC absorbance trace using
//! a log-log-square-root (LLS) stabilising transform followed by an
//! iterative symmetric local-minimum filter.
//!
//! ## Algorithm
//!
//! 1. If any sample is negative, compute `shift = median(negative samples)`
//!    and subtract it from every sample (pulling the minimum toward zero),
//!    then rectify with `max(value, 0)`.
//! 2. Transform: `t = ln(ln(sqrt(x + 1) + 1) + 1)`.
//! 3. For `i` in `1..=iterations`, for every `j` in `i..len - i`, replace
//!    `t[j]` with `min(t[j], (t[j + i] + t[j - i]) / 2)`. The pass updates the
//!    buffer in place, so `t[j - i]` already holds its filtered value.
//! 4. Invert the transform to get the baseline in signal units and subtract
//!    it from the rectified signal.
//!
//! Corrected values are rounded to a fixed number of decimals. Small negative
//! residuals near the noise floor are kept as-is, never clamped.

#[cfg(test)]
mod tests;

use log::{debug, info};

use crate::stats;
use crate::trace::{Trace, TraceError};

/// Configuration for [`BaselineCorrector`]
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineConfig {
    /// Number of filter passes (the largest half-window, in samples)
    pub iterations: usize,

    /// Decimal places kept in the corrected signal
    pub decimals: u32,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            iterations: 20,
            decimals: 9,
        }
    }
}

/// Output of a baseline correction, all traces on the input time axis
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineCorrectionResult {
    /// Baseline-corrected signal: `uncorrected - (baseline - shift)`, rounded
    pub corrected: Trace,

    /// Estimated baseline in the units of the original input
    pub baseline: Trace,

    /// Input after applying the shift and rectification
    pub uncorrected: Trace,

    /// Median of the negative input samples, `0.0` when none were negative
    pub shift: f64,
}

/// LLS baseline estimator
#[derive(Debug, Clone, Default)]
pub struct BaselineCorrector {
    config: BaselineConfig,
}

impl BaselineCorrector {
    /// Create a corrector with the given configuration
    pub fn new(config: BaselineConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &BaselineConfig {
        &self.config
    }

    /// Baseline-correct a trace. Fails only on an empty trace.
    pub fn correct(&self, trace: &Trace) -> Result<BaselineCorrectionResult, TraceError> {
        trace.require_non_empty()?;

        let shift = negative_shift(trace.values());
        let rectified: Vec<f64> = trace
            .values()
            .iter()
            .map(|&v| (v - shift).max(0.0))
            .collect();

        let mut tform: Vec<f64> = rectified.iter().map(|&x| lls_forward(x)).collect();
        suppress_peaks(&mut tform, self.config.iterations);

        let inverse: Vec<f64> = tform.iter().map(|&t| lls_inverse(t)).collect();

        let corrected: Vec<f64> = rectified
            .iter()
            .zip(inverse.iter())
            .map(|(&x, &b)| stats::round_to(x - b, self.config.decimals))
            .collect();
        let baseline: Vec<f64> = inverse.iter().map(|&b| b + shift).collect();

        debug!(
            "Baseline correction: {} samples, shift {:.6}, {} passes",
            trace.len(),
            shift,
            self.config.iterations
        );
        info!("Baseline corrected chromatogram calculated.");

        Ok(BaselineCorrectionResult {
            corrected: trace.with_values(corrected)?,
            baseline: trace.with_values(baseline)?,
            uncorrected: trace.with_values(rectified)?,
            shift,
        })
    }
}

/// Median of the negative samples, or `0.0` when there are none
pub fn negative_shift(values: &[f64]) -> f64 {
    let negatives: Vec<f64> = values.iter().copied().filter(|&v| v < 0.0).collect();
    if negatives.is_empty() {
        0.0
    } else {
        stats::median(&negatives)
    }
}

fn lls_forward(x: f64) -> f64 {
    ((x + 1.0).sqrt() + 1.0).ln().ln_1p()
}

fn lls_inverse(t: f64) -> f64 {
    let inner = (t.exp() - 1.0).exp() - 1.0;
    inner * inner - 1.0
}

/// In-place symmetric minimum filter over growing half-windows `1..=iterations`
fn suppress_peaks(tform: &mut [f64], iterations: usize) {
    let n = tform.len();
    for i in 1..=iterations {
        if 2 * i >= n {
            break;
        }
        for j in i..n - i {
            let avg = 0.5 * (tform[j + i] + tform[j - i]);
            if avg < tform[j] {
                tform[j] = avg;
            }
        }
    }
}
