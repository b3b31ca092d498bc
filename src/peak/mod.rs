//! # Peak Integration Module
//!
//! Locates, bounds, integrates and scores chromatographic peaks in a
//! [`Trace`](crate::trace::Trace).
//!
//! ## Pipeline
//!
//! 1. **Apex**: local maxima are filtered with an adaptive prominence of
//!    `max(3 * std, 0.5% * max)`, height `2 * std` and a separation of 3
//!    samples; the candidate nearest the target time wins, otherwise the
//!    global maximum.
//! 2. **Boundaries**: walk outwards until the signal reaches an adaptive
//!    floor, a shallow valley, or `max_peak_width`; widen to
//!    `min_peak_width` if needed. A degenerate window falls back to a fixed
//!    width of `(min + max) / 2`.
//! 3. **Area**: trapezoidal integral of the window, and of the window minus
//!    a straight line between the boundary values. LC traces arrive
//!    baseline corrected, so both areas are the same integral.
//! 4. **Quality**: SNR against the flanking noise, blended with symmetry
//!    and baseline stability (see [`quality`]).
//!
//! Traces with fewer than 5 samples cannot be integrated; use
//! [`PeakIntegrator::integrate_or_fallback`] to receive a `fallback_sum`
//! record instead of an error.
//!
//! ## Example
//!
//! ```rust
//! use lcquant::peak::{IntegrationMethod, PeakIntegrator};
//! use lcquant::trace::Trace;
//!
//! let times: Vec<f64> = (0..100).map(|i| i as f64 * 0.1).collect();
//! let values: Vec<f64> = times
//!     .iter()
//!     .map(|t| 1000.0 + 50_000.0 * (-(t - 5.0f64).powi(2) / (2.0 * 0.25)).exp())
//!     .collect();
//! let trace = Trace::new(times, values).unwrap();
//!
//! let record = PeakIntegrator::ms().integrate_ms(&trace, 5.0).unwrap();
//! assert_eq!(record.integration_method, IntegrationMethod::Trapezoidal);
//! assert!(record.start_time < 5.0 && 5.0 < record.end_time);
//! ```

mod boundaries;
mod config;
mod error;
pub mod finder;
mod integrator;
mod lc_table;
pub mod quality;
mod record;

#[cfg(test)]
mod tests;

pub use boundaries::{
    adaptive_floor, detect_boundaries, fixed_width_boundaries, linear_baseline, PeakBounds,
};
pub use config::{IntegrationConfig, MIN_INTEGRATION_SAMPLES};
pub use error::PeakIntegrationError;
pub use finder::{find_peaks, locate_peak_maximum, PeakCandidate, PeakParams};
pub use integrator::{PeakIntegrator, TraceOrigin};
pub use lc_table::{
    detect_lc_peaks, lc_prominence_threshold, LcPeak, LcPeakTable, DEFAULT_RT_TOLERANCE,
};
pub use quality::QualityMetrics;
pub use record::{IntegrationMethod, PeakRecord};
