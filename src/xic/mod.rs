//! # Ion Chromatogram Module
//!
//! Turns a sequence of full-scan spectra into per-ion intensity traces.
//!
//! Two pathways exist:
//!
//! - **Targeted** ([`XicExtractor::extract`]): for every full scan, the data
//!   point nearest the target m/z inside the ion's tolerance window becomes
//!   one sample. Scans without a match contribute nothing; gaps are never
//!   filled.
//! - **Full axis** ([`MzAxisBuilder`], [`XicExtractor::interpolate_onto_axis`],
//!   [`XicExtractor::average_spectrum`]): scans are interpolated onto a
//!   shared, uniformly spaced m/z axis derived from instrument metadata.
//!
//! ## Example
//!
//! ```rust
//! use lcquant::xic::{IonTarget, MassTolerance, Scan, XicExtractor};
//!
//! let scans = vec![
//!     Scan::ms1(1.0, vec![100.0, 150.0002], vec![10.0, 500.0]),
//!     Scan::ms1(1.1, vec![100.0, 150.0001], vec![12.0, 900.0]),
//! ];
//! let target = IonTarget::new(150.0).with_tolerance(MassTolerance::Ppm(5.0));
//! let xic = XicExtractor::new().extract(&scans, &target).unwrap();
//! assert_eq!(xic.trace.len(), 2);
//! assert_eq!(xic.representative_rt, Some(1.1));
//! ```

mod axis;
mod error;
mod extractor;
mod types;


pub use axis::{MzAxisBuilder, DEFAULT_MZ_STEP, MAX_AXIS_POINTS};
pub use error::XicError;
pub use extractor::XicExtractor;
pub use types::{IonTarget, MassTolerance, MzWindow, Scan, Xic};
