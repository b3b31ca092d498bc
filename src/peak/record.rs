use std::fmt;

use serde::{Deserialize, Serialize};

use crate::trace::Trace;

/// How a [`PeakRecord`] was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMethod {
    /// Boundary-detected trapezoidal integration
    Trapezoidal,
    /// Plain sum of the trace after integration was not possible
    FallbackSum,
    /// No integration was attempted
    #[default]
    None,
}

impl IntegrationMethod {
    /// Tag used in exported tables
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationMethod::Trapezoidal => "trapezoidal",
            IntegrationMethod::FallbackSum => "fallback_sum",
            IntegrationMethod::None => "none",
        }
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of integrating one peak
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PeakRecord {
    /// Trapezoidal area of the raw window
    pub total_area: f64,
    /// Area above the local linear baseline
    pub baseline_corrected_area: f64,
    /// Time of the first window sample
    pub start_time: f64,
    /// Time of the last window sample
    pub end_time: f64,
    /// Index of the first window sample
    pub start_index: usize,
    /// Index of the last window sample
    pub end_index: usize,
    /// Signal at the left boundary (0 for pre-corrected traces)
    pub baseline_start: f64,
    /// Signal at the right boundary (0 for pre-corrected traces)
    pub baseline_end: f64,
    /// Apex height above the local baseline
    pub peak_height: f64,
    /// Production method tag
    pub integration_method: IntegrationMethod,
    /// Signal-to-noise ratio
    pub snr: f64,
    /// Quality score in `[0, 1]`
    pub quality_score: f64,
}

impl PeakRecord {
    /// Degraded record from a trace that could not be integrated: the sum
    /// of all values as area, the maximum as height and the time span as
    /// window, with zero SNR and quality
    pub fn fallback_sum(trace: &Trace) -> Self {
        let total = trace.value_sum();
        let height = if trace.is_empty() {
            0.0
        } else {
            trace
                .values()
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max)
        };
        let (start_time, end_time) = trace.time_range().unwrap_or((0.0, 0.0));

        Self {
            total_area: total,
            baseline_corrected_area: total,
            start_time,
            end_time,
            peak_height: height,
            integration_method: IntegrationMethod::FallbackSum,
            ..Self::default()
        }
    }

    /// Placeholder record for data that was never integrated
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether the record came from boundary-detected integration
    pub fn is_integrated(&self) -> bool {
        self.integration_method == IntegrationMethod::Trapezoidal
    }

    /// Peak duration in minutes
    pub fn width(&self) -> f64 {
        self.end_time - self.start_time
    }
}
