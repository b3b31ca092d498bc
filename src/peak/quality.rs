//! Signal-to-noise and quality scoring for an integrated peak.
//!
//! `quality = 0.4 * min(1, snr / 50) + 0.35 * symmetry + 0.25 * stability`,
//! halved when `snr < 3` and clamped to `[0, 1]`.

use super::PeakBounds;
use crate::stats;

const NOISE_FLANK: usize = 20;
const SNR_SATURATION: f64 = 50.0;
const LOW_SNR: f64 = 3.0;
const LOW_SNR_PENALTY: f64 = 0.5;

const WEIGHT_SNR: f64 = 0.4;
const WEIGHT_SYMMETRY: f64 = 0.35;
const WEIGHT_STABILITY: f64 = 0.25;

/// Quality figures for one peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityMetrics {
    /// Apex height above the local baseline divided by the noise estimate
    pub snr: f64,
    /// Weighted blend in `[0, 1]`
    pub quality_score: f64,
    /// Noise estimate the SNR was computed with
    pub noise: f64,
    /// Left/right balance blended with the 10%-height tailing score
    pub symmetry: f64,
    /// Flatness of the flanking noise regions
    pub baseline_stability: f64,
}

/// Samples flanking the window: up to 20 before `start` and up to 20 from
/// `end` onwards
pub fn noise_region(values: &[f64], bounds: &PeakBounds) -> Vec<f64> {
    let left_start = bounds.start.saturating_sub(NOISE_FLANK);
    let right_end = (bounds.end + NOISE_FLANK).min(values.len());

    let mut region = Vec::with_capacity(2 * NOISE_FLANK);
    region.extend_from_slice(&values[left_start..bounds.start]);
    if bounds.end < right_end {
        region.extend_from_slice(&values[bounds.end..right_end]);
    }
    region
}

/// Noise amplitude from the flanking region, or from the whole trace when
/// the region is empty
pub fn estimate_noise(values: &[f64], region: &[f64], apex_value: f64) -> f64 {
    if !region.is_empty() {
        return stats::std_dev(region).max(stats::mean(region) * 0.01);
    }

    let positive: Vec<f64> = values.iter().copied().filter(|&v| v > 0.0).collect();
    if positive.len() > 10 {
        stats::lower_tail_std(&positive, 20.0).max(stats::percentile(&positive, 5.0) * 0.1)
    } else {
        (apex_value * 0.01).max(1.0)
    }
}

/// Peak balance in `[0, 1]`.
///
/// Blends `1 - |left - right| / (left + right)` (sample counts either side
/// of the apex) with a tailing score from the 10%-height points when the
/// window has more than 4 samples.
pub fn symmetry_score(window: &[f64], apex_offset: usize) -> f64 {
    let left_half = apex_offset as f64;
    let right_half = (window.len() - 1 - apex_offset) as f64;
    let basic = 1.0 - (left_half - right_half).abs() / (left_half + right_half).max(1.0);

    if window.len() <= 4 {
        return basic;
    }

    let tenth = window[apex_offset] * 0.1;
    let left_idx = if apex_offset > 0 {
        stats::argmin_abs_diff(&window[..apex_offset], tenth).unwrap_or(0)
    } else {
        0
    };
    let right_idx =
        apex_offset + stats::argmin_abs_diff(&window[apex_offset..], tenth).unwrap_or(0);

    if right_idx <= left_idx {
        return basic;
    }

    let denominator = 2.0 * (apex_offset - left_idx) as f64;
    let tailing_score = if denominator > 0.0 {
        let tailing_factor = (right_idx - left_idx) as f64 / denominator;
        (1.0 - (tailing_factor - 1.0).abs()).max(0.0)
    } else {
        0.0
    };
    (basic + tailing_score) / 2.0
}

/// Flatness of the noise region: `max(0, 1 - std / (mean + 1))`, or 1 with
/// fewer than two samples
pub fn baseline_stability(region: &[f64]) -> f64 {
    if region.len() > 1 {
        (1.0 - stats::std_dev(region) / (stats::mean(region) + 1.0)).max(0.0)
    } else {
        1.0
    }
}

/// Score the peak at `apex` inside `bounds`. `baseline` covers the window;
/// pass zeros for traces that are already baseline corrected.
pub fn quality_metrics(
    values: &[f64],
    baseline: &[f64],
    bounds: &PeakBounds,
    apex: usize,
) -> QualityMetrics {
    let apex_offset = apex - bounds.start;
    let baseline_at_apex = baseline.get(apex_offset).copied().unwrap_or(0.0);
    let signal = values[apex] - baseline_at_apex;

    let region = noise_region(values, bounds);
    let noise = estimate_noise(values, &region, values[apex]);
    let snr = if noise > 0.0 { signal / noise } else { 0.0 };

    let window = &values[bounds.start..=bounds.end];
    let symmetry = symmetry_score(window, apex_offset);
    let stability = baseline_stability(&region);

    let mut quality = WEIGHT_SNR * (snr / SNR_SATURATION).min(1.0)
        + WEIGHT_SYMMETRY * symmetry
        + WEIGHT_STABILITY * stability;
    if snr < LOW_SNR {
        quality *= LOW_SNR_PENALTY;
    }

    QualityMetrics {
        snr,
        quality_score: quality.clamp(0.0, 1.0),
        noise,
        symmetry,
        baseline_stability: stability,
    }
}
