//! # Pipeline Module
//!
//! Batch quantitation: per-file XIC extraction and MS peak integration, LC
//! baseline correction with peak-table matching, per-compound calibration
//! and concentration back-calculation.
//!
//! ## Scheduling
//!
//! - Every file is an independent unit processed on the rayon pool; a
//!   failing file is logged and reported in [`BatchOutcome::failures`].
//! - Calibration runs one task per compound, which alone owns that
//!   compound's curve while it is fitted.
//! - Finished curves are only read, so quantitation of all samples runs
//!   concurrently.
//! - A [`CancellationToken`] is checked before each file and compound.
//!
//! ## Example
//!
//! ```
//! use lcquant::compound::Compound;
//! use lcquant::measurement::ConcentrationMap;
//! use lcquant::pipeline::{Pipeline, PipelineConfig, SampleInput};
//! use lcquant::xic::Scan;
//!
//! let scans: Vec<Scan> = (0..50)
//!     .map(|i| {
//!         let rt = i as f64 * 0.1;
//!         let intensity = 1000.0 + 5e4 * (-(rt - 2.5f64).powi(2) / 0.5).exp();
//!         Scan::ms1(rt, vec![150.0], vec![intensity])
//!     })
//!     .collect();
//!
//! let pipeline = Pipeline::new(
//!     PipelineConfig::default(),
//!     vec![Compound::new("Alanine", &[150.0])],
//! )
//! .unwrap();
//! let outcome = pipeline.run(&[SampleInput::new("sample_1", scans)], &ConcentrationMap::new());
//! assert_eq!(outcome.samples.len(), 1);
//! assert!(outcome.samples[0].compounds[0].ions[0].ms_peak.is_integrated());
//! ```

mod batch;
mod config;
mod error;
mod progress;
mod sample;

pub use batch::Pipeline;
pub use config::PipelineConfig;
pub use error::{PipelineError, UnitFailure};
pub use progress::{CancellationToken, ProgressEvent};
pub use sample::{BatchOutcome, CalibrationOutcome, LcAnalysis, SampleInput, SampleResult};
