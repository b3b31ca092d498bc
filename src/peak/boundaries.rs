//! Peak window detection and the local linear baseline.

use log::debug;

use super::{IntegrationConfig, PeakIntegrationError};
use crate::stats;

/// Integration window around a peak apex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakBounds {
    /// First sample of the window
    pub start: usize,
    /// Last sample of the window (inclusive)
    pub end: usize,
    /// Signal value at `start`
    pub baseline_start: f64,
    /// Signal value at `end`
    pub baseline_end: f64,
}

impl PeakBounds {
    fn new(values: &[f64], start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            baseline_start: values[start],
            baseline_end: values[end],
        }
    }

    /// Number of samples in the window
    pub fn sample_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Intensity floor for the boundary walk:
/// `max(noise_threshold, 2% of apex, p10 + 3 * std(values <= p25))`
pub fn adaptive_floor(values: &[f64], apex_value: f64, noise_threshold: f64) -> f64 {
    let p10 = stats::percentile(values, 10.0);
    let low_noise = stats::lower_tail_std(values, 25.0);
    noise_threshold
        .max(apex_value * 0.02)
        .max(p10 + 3.0 * low_noise)
}

fn is_valley(values: &[f64], i: usize) -> bool {
    i > 0 && i + 1 < values.len() && values[i] < values[i - 1] && values[i] < values[i + 1]
}

/// Walk outwards from `peak` until the signal reaches the adaptive floor,
/// hits a valley no deeper than twice the floor, or leaves
/// `max_peak_width`. A side that runs out of time or samples keeps the
/// apex as its boundary. Windows narrower than `min_peak_width` are
/// re-centred to exactly that width.
pub fn detect_boundaries(
    times: &[f64],
    values: &[f64],
    peak: usize,
    config: &IntegrationConfig,
) -> Result<PeakBounds, PeakIntegrationError> {
    if peak >= values.len() || times.len() != values.len() {
        return Err(PeakIntegrationError::BoundaryDetection(format!(
            "apex index {} outside trace of {} samples",
            peak,
            values.len()
        )));
    }

    let peak_time = times[peak];
    let floor = adaptive_floor(values, values[peak], config.noise_threshold);
    if !floor.is_finite() {
        return Err(PeakIntegrationError::BoundaryDetection(
            "intensity floor is not finite".to_string(),
        ));
    }

    let mut start = peak;
    for i in (0..peak).rev() {
        if peak_time - times[i] > config.max_peak_width {
            break;
        }
        if values[i] <= floor {
            start = i;
            break;
        }
        if is_valley(values, i) && values[i] <= 2.0 * floor {
            start = i;
            break;
        }
    }

    let mut end = peak;
    for i in peak + 1..values.len() {
        if times[i] - peak_time > config.max_peak_width {
            break;
        }
        if values[i] <= floor {
            end = i;
            break;
        }
        if is_valley(values, i) && values[i] <= 2.0 * floor {
            end = i;
            break;
        }
    }

    if times[end] - times[start] < config.min_peak_width {
        let half = config.min_peak_width / 2.0;
        start = nearest_index(times, peak_time - half, peak);
        end = nearest_index(times, peak_time + half, peak);
    }

    if end <= start {
        return Err(PeakIntegrationError::BoundaryDetection(format!(
            "degenerate window [{}, {}] around apex {}",
            start, end, peak
        )));
    }

    debug!(
        "Boundaries for apex {}: [{}, {}] (floor {:.3})",
        peak, start, end, floor
    );
    Ok(PeakBounds::new(values, start, end))
}

/// Fixed window of `(min + max) / 2` minutes centred on the apex
pub fn fixed_width_boundaries(
    times: &[f64],
    values: &[f64],
    peak: usize,
    config: &IntegrationConfig,
) -> PeakBounds {
    let half = config.fallback_width() / 2.0;
    let peak_time = times[peak];
    let start = nearest_index(times, peak_time - half, peak);
    let end = nearest_index(times, peak_time + half, peak);
    PeakBounds::new(values, start.min(peak), end.max(peak))
}

fn nearest_index(times: &[f64], target: f64, default: usize) -> usize {
    stats::argmin_abs_diff(times, target).unwrap_or(default)
}

/// Straight line from `values[start]` to `values[end]` across the window
pub fn linear_baseline(values: &[f64], bounds: &PeakBounds) -> Vec<f64> {
    stats::linspace(values[bounds.start], values[bounds.end], bounds.sample_count())
}
