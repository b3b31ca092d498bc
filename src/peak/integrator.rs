use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use super::boundaries::{detect_boundaries, fixed_width_boundaries, linear_baseline};
use super::finder::locate_peak_maximum;
use super::quality::quality_metrics;
use super::{
    IntegrationConfig, IntegrationMethod, PeakBounds, PeakIntegrationError, PeakRecord,
    MIN_INTEGRATION_SAMPLES,
};
use crate::stats;
use crate::trace::Trace;

/// What a trace contains, which decides how its baseline is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOrigin {
    /// Raw extracted-ion intensities; a local linear baseline is subtracted
    MsXic,
    /// Absorbance already baseline corrected upstream; no second correction
    LcCorrected,
}

/// Locates, bounds, integrates and scores a single chromatographic peak
#[derive(Debug, Clone)]
pub struct PeakIntegrator {
    config: IntegrationConfig,
}

impl PeakIntegrator {
    /// Create an integrator with the given limits
    pub fn new(config: IntegrationConfig) -> Self {
        Self { config }
    }

    /// Integrator with MS defaults
    pub fn ms() -> Self {
        Self::new(IntegrationConfig::ms())
    }

    /// Integrator with LC defaults
    pub fn lc() -> Self {
        Self::new(IntegrationConfig::lc())
    }

    /// Limits in use
    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// Integrate the peak nearest `target_time`.
    ///
    /// Fails with [`PeakIntegrationError::InsufficientData`] below 5
    /// samples. Boundary detection failures fall back to a fixed window and
    /// never surface.
    pub fn integrate(
        &self,
        trace: &Trace,
        target_time: f64,
        origin: TraceOrigin,
    ) -> Result<PeakRecord, PeakIntegrationError> {
        self.config.validate()?;
        if trace.len() < MIN_INTEGRATION_SAMPLES {
            return Err(PeakIntegrationError::InsufficientData {
                required: MIN_INTEGRATION_SAMPLES,
                got: trace.len(),
            });
        }

        let times = trace.times();
        let values = trace.values();
        let apex = locate_peak_maximum(times, values, target_time).ok_or(
            PeakIntegrationError::InsufficientData {
                required: MIN_INTEGRATION_SAMPLES,
                got: 0,
            },
        )?;

        let bounds = match detect_boundaries(times, values, apex, &self.config) {
            Ok(bounds) => bounds,
            Err(PeakIntegrationError::BoundaryDetection(reason)) => {
                warn!("Boundary detection failed ({}), using fixed width", reason);
                fixed_width_boundaries(times, values, apex, &self.config)
            }
            Err(e) => return Err(e),
        };

        let record = match origin {
            TraceOrigin::MsXic => self.integrate_with_local_baseline(times, values, apex, bounds),
            TraceOrigin::LcCorrected => self.integrate_corrected(times, values, apex, bounds),
        };
        debug!(
            "Integrated {:?} peak at {:.3} min: area {:.3}, snr {:.2}, quality {:.3}",
            origin, times[apex], record.baseline_corrected_area, record.snr, record.quality_score
        );
        Ok(record)
    }

    /// Integrate an extracted-ion chromatogram
    pub fn integrate_ms(
        &self,
        trace: &Trace,
        target_time: f64,
    ) -> Result<PeakRecord, PeakIntegrationError> {
        self.integrate(trace, target_time, TraceOrigin::MsXic)
    }

    /// Integrate a baseline-corrected LC trace
    pub fn integrate_lc(
        &self,
        corrected: &Trace,
        target_time: f64,
    ) -> Result<PeakRecord, PeakIntegrationError> {
        self.integrate(corrected, target_time, TraceOrigin::LcCorrected)
    }

    /// Like [`PeakIntegrator::integrate`], substituting
    /// [`PeakRecord::fallback_sum`] for any failure
    pub fn integrate_or_fallback(
        &self,
        trace: &Trace,
        target_time: f64,
        origin: TraceOrigin,
    ) -> PeakRecord {
        match self.integrate(trace, target_time, origin) {
            Ok(record) => record,
            Err(PeakIntegrationError::InsufficientData { got, .. }) => {
                warn!(
                    "Insufficient data for peak integration ({} samples), using simple sum",
                    got
                );
                PeakRecord::fallback_sum(trace)
            }
            Err(e) => {
                error!("Peak integration failed with unexpected error: {}", e);
                PeakRecord::fallback_sum(trace)
            }
        }
    }

    fn integrate_with_local_baseline(
        &self,
        times: &[f64],
        values: &[f64],
        apex: usize,
        bounds: PeakBounds,
    ) -> PeakRecord {
        let window_t = &times[bounds.start..=bounds.end];
        let window_y = &values[bounds.start..=bounds.end];
        let baseline = linear_baseline(values, &bounds);

        let total_area = stats::trapezoid(window_y, window_t);
        let above: Vec<f64> = window_y
            .iter()
            .zip(baseline.iter())
            .map(|(y, b)| y - b)
            .collect();
        let baseline_corrected_area = stats::trapezoid(&above, window_t);

        let quality = quality_metrics(values, &baseline, &bounds, apex);
        let peak_height = values[apex] - baseline[apex - bounds.start];

        PeakRecord {
            total_area,
            baseline_corrected_area,
            start_time: times[bounds.start],
            end_time: times[bounds.end],
            start_index: bounds.start,
            end_index: bounds.end,
            baseline_start: bounds.baseline_start,
            baseline_end: bounds.baseline_end,
            peak_height,
            integration_method: IntegrationMethod::Trapezoidal,
            snr: quality.snr,
            quality_score: quality.quality_score,
        }
    }

    fn integrate_corrected(
        &self,
        times: &[f64],
        values: &[f64],
        apex: usize,
        bounds: PeakBounds,
    ) -> PeakRecord {
        let window_t = &times[bounds.start..=bounds.end];
        let window_y = &values[bounds.start..=bounds.end];
        let total_area = stats::trapezoid(window_y, window_t);

        let zero_baseline = vec![0.0; bounds.sample_count()];
        let quality = quality_metrics(values, &zero_baseline, &bounds, apex);

        PeakRecord {
            total_area,
            baseline_corrected_area: total_area,
            start_time: times[bounds.start],
            end_time: times[bounds.end],
            start_index: bounds.start,
            end_index: bounds.end,
            baseline_start: 0.0,
            baseline_end: 0.0,
            peak_height: values[apex],
            integration_method: IntegrationMethod::Trapezoidal,
            snr: quality.snr,
            quality_score: quality.quality_score,
        }
    }
}
