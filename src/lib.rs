//! # lcquant - LC-MS Quantitation
//!
//! `lcquant` turns raw LC-MS measurements into per-compound concentrations:
//! it baseline-corrects LC absorbance traces, extracts ion chromatograms
//! from MS scans, integrates chromatographic peaks and fits calibration
//! curves across a concentration series.
//!
//! ## Data Flow
//!
//! ```text
//! LC trace ──▶ BaselineCorrector ──▶ corrected trace ──▶ LC peak table
//!                                                             │ (RT match)
//! MS scans ──▶ XicExtractor ──▶ XIC per ion ──▶ PeakIntegrator ──▶ PeakRecord
//!                                                             │
//! calibration standards ──▶ CalibrationEngine ──▶ curve ──▶ concentration
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use lcquant::prelude::*;
//!
//! // A Gaussian peak on a flat baseline, sampled every 0.1 min
//! let times: Vec<f64> = (0..100).map(|i| i as f64 * 0.1).collect();
//! let values: Vec<f64> = times
//!     .iter()
//!     .map(|t| 1000.0 + 50_000.0 * (-(t - 5.0f64).powi(2) / 0.5).exp())
//!     .collect();
//! let trace = Trace::new(times, values)?;
//!
//! let record = PeakIntegrator::ms().integrate_ms(&trace, 5.0)?;
//! assert_eq!(record.integration_method, IntegrationMethod::Trapezoidal);
//! assert!(record.baseline_corrected_area > 0.0);
//! # Ok::<(), lcquant::peak::PeakIntegrationError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`trace`]: the time-ordered `(time, value)` sequence every stage consumes
//! - [`stats`]: percentiles, trapezoid rule and linear regression
//! - [`baseline`]: LLS baseline correction for LC traces
//! - [`xic`]: mass tolerances, m/z axes and extracted-ion chromatograms
//! - [`peak`]: peak finding, boundaries, quality metrics and integration
//! - [`compound`]: compounds, their ions and per-file results
//! - [`measurement`]: file naming conventions for calibration standards
//! - [`calibration`]: calibration curves and concentration back-calculation
//! - [`pipeline`]: parallel batch processing with cancellation and progress
//! - [`export`]: flat result tables as CSV or JSON
//! - [`source`]: loading scans, chromatograms, compound lists and
//!   calibration maps

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod baseline;
pub mod calibration;
pub mod compound;
pub mod export;
pub mod measurement;
pub mod peak;
pub mod pipeline;
pub mod source;
pub mod stats;
pub mod trace;
pub mod xic;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::baseline::{BaselineConfig, BaselineCorrectionResult, BaselineCorrector};
    pub use crate::calibration::{
        parse_concentration, CalibrationBuilder, CalibrationConfig, CalibrationCurve,
        CalibrationEngine, CalibrationError, CalibrationParameters, CalibrationPoint,
        CalibrationSample, SignalMethod,
    };
    pub use crate::compound::{Compound, CompoundResult, IonResult};
    pub use crate::export::{ExportError, ResultRow, RunSummary};
    pub use crate::measurement::ConcentrationMap;
    pub use crate::peak::{
        detect_lc_peaks, IntegrationConfig, IntegrationMethod, LcPeak, LcPeakTable,
        PeakIntegrationError, PeakIntegrator, PeakRecord, TraceOrigin,
    };
    pub use crate::pipeline::{
        BatchOutcome, CancellationToken, Pipeline, PipelineConfig, PipelineError,
        ProgressEvent, SampleInput, SampleResult,
    };
    pub use crate::source::{ChromatogramSource, ScanSource, SourceError};
    pub use crate::trace::{Trace, TraceError};
    pub use crate::xic::{
        IonTarget, MassTolerance, MzAxisBuilder, Scan, Xic, XicError, XicExtractor,
    };
}
