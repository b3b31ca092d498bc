use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::finder::{find_peaks, PeakParams};
use super::{IntegrationConfig, PeakIntegrator, PeakRecord, TraceOrigin};
use crate::stats;
use crate::trace::Trace;

/// RT tolerance in minutes used when matching LC peaks to ion retention times
pub const DEFAULT_RT_TOLERANCE: f64 = 0.2;

/// One detected LC peak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LcPeak {
    /// 1-based position in the table
    pub peak_number: usize,
    /// Apex retention time
    pub peak_rt: f64,
    /// Integration result
    pub record: PeakRecord,
}

/// All peaks found in a baseline-corrected LC trace, in RT order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LcPeakTable {
    peaks: Vec<LcPeak>,
}

impl LcPeakTable {
    /// Detected peaks
    pub fn peaks(&self) -> &[LcPeak] {
        &self.peaks
    }

    /// Number of peaks
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// Whether no peak was detected
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// First peak whose apex lies within `tolerance` minutes of `rt`
    pub fn peak_at_rt(&self, rt: f64, tolerance: f64) -> Option<&LcPeak> {
        self.peaks
            .iter()
            .find(|p| (p.peak_rt - rt).abs() <= tolerance)
    }
}

/// Prominence threshold for whole-trace LC peak picking:
/// `max(5, 4 * noise, 2 * std, 0.5% * (max - p10))` with
/// `noise = std(values <= p25)`
pub fn lc_prominence_threshold(values: &[f64]) -> f64 {
    let noise = stats::lower_tail_std(values, 25.0);
    let p10 = stats::percentile(values, 10.0);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    5.0_f64
        .max(4.0 * noise)
        .max(2.0 * stats::std_dev(values))
        .max(0.005 * (max - p10))
}

/// Find and integrate every peak in a baseline-corrected LC trace.
///
/// Each peak is integrated with `config`'s widths and a noise threshold of
/// half the prominence threshold. Peaks that fail integration get a
/// fallback-sum record.
pub fn detect_lc_peaks(corrected: &Trace, config: &IntegrationConfig) -> LcPeakTable {
    let values = corrected.values();
    if values.is_empty() {
        return LcPeakTable::default();
    }

    let prominence = lc_prominence_threshold(values);
    let noise = stats::lower_tail_std(values, 25.0);
    let params = PeakParams {
        min_height: Some(stats::percentile(values, 10.0) + 3.0 * noise),
        min_prominence: Some(prominence),
        min_width: Some(2.0),
        distance: 3,
    };
    let candidates = find_peaks(values, &params);
    info!("Found {} peaks in LC chromatogram", candidates.len());

    let integrator =
        PeakIntegrator::new(config.clone().with_noise_threshold(prominence * 0.5));

    let peaks = candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let peak_rt = corrected.times()[candidate.index];
            let record = match integrator.integrate(corrected, peak_rt, TraceOrigin::LcCorrected) {
                Ok(record) => record,
                Err(e) => {
                    warn!("LC peak area calculation failed at RT {:.2}: {}", peak_rt, e);
                    PeakRecord::fallback_sum(corrected)
                }
            };
            LcPeak {
                peak_number: i + 1,
                peak_rt,
                record,
            }
        })
        .collect();

    LcPeakTable { peaks }
}
