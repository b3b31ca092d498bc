//! # Calibration Module
//!
//! Turns per-file compound signals from a concentration series into linear
//! calibration curves and back-calculates concentrations for unknowns.
//!
//! ## Signal policy
//!
//! A compound's signal is the sum over its ions of the baseline-corrected
//! MS peak area, using the rounded XIC intensity sum for any ion without a
//! positive area. If the resulting fit has R² below 0.75, the whole compound
//! is refitted on intensity sums and the curve remembers that choice, so
//! unknown samples are measured the same way.
//!
//! ## Concentrations
//!
//! Calibration inputs are strings such as `"2.5 mM"` or `"100 uM"`,
//! normalised to millimolar by [`parse_concentration`]. Back-calculated
//! concentrations are `(signal - intercept) / slope`, rounded to six
//! decimals, with non-finite or negative results reported as 0.
//!
//! ## Example
//!
//! ```
//! use lcquant::calibration::{parse_concentration, CalibrationBuilder, CalibrationConfig, CalibrationPoint};
//!
//! let builder = ["1 mM", "2 mM", "4 mM"].iter().fold(
//!     CalibrationBuilder::new("Glycine"),
//!     |builder, label| {
//!         let c = parse_concentration(label).unwrap().unwrap();
//!         builder.add_point(CalibrationPoint {
//!             concentration: c,
//!             peak_area_signal: 50.0 * c + 2.0,
//!             intensity_sum_signal: 120.0 * c,
//!         })
//!     },
//! );
//! let curve = builder.finish(&CalibrationConfig::default()).unwrap();
//! assert_eq!(curve.concentration_for(102.0), 2.0);
//! ```

mod builder;
mod curve;
mod engine;
mod error;
mod signal;
mod units;

pub use builder::CalibrationBuilder;
pub use curve::{
    CalibrationCurve, CalibrationParameters, CalibrationPoint, CONCENTRATION_DECIMALS,
};
pub use engine::{
    CalibrationConfig, CalibrationEngine, CalibrationSample, DEFAULT_R_SQUARED_THRESHOLD,
};
pub use error::CalibrationError;
pub use signal::{compound_signal, ion_signal, CompoundSignal, SignalMethod};
pub use units::{parse_concentration, unit_multiplier};

#[cfg(test)]
mod tests;
