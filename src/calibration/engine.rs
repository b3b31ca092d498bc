use log::{error, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{CalibrationBuilder, CalibrationCurve, CalibrationError};
use crate::compound::{Compound, IonResult};

/// R² below which peak-area calibration is abandoned
pub const DEFAULT_R_SQUARED_THRESHOLD: f64 = 0.75;

/// Calibration policy settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Peak-area fits below this R² are replaced by an intensity-sum fit
    pub r_squared_threshold: f64,

    /// Intensity-sum fallback fits below this R² leave the compound
    /// uncalibrated (0 accepts any fit)
    pub min_fallback_r_squared: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            r_squared_threshold: DEFAULT_R_SQUARED_THRESHOLD,
            min_fallback_r_squared: 0.0,
        }
    }
}

/// One calibration standard as seen by a single compound
#[derive(Debug, Clone, Copy)]
pub struct CalibrationSample<'a> {
    /// Known concentration in mM
    pub concentration: f64,
    /// The compound's per-ion results in that standard
    pub ions: &'a [IonResult],
}

/// Builds calibration curves and back-calculates concentrations
#[derive(Debug, Clone, Default)]
pub struct CalibrationEngine {
    config: CalibrationConfig,
}

impl CalibrationEngine {
    /// Engine with the given policy
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// Active policy
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Fit a compound's curve from its calibration standards.
    ///
    /// Per-standard signals are computed in parallel; the fit runs once all
    /// of them are collected. Later standards at a repeated concentration
    /// replace earlier ones.
    pub fn build_curve(
        &self,
        compound: &Compound,
        samples: &[CalibrationSample<'_>],
    ) -> Result<CalibrationCurve, CalibrationError> {
        if compound.has_no_ions() {
            let err = CalibrationError::NoIons(compound.name.clone());
            error!("{}", err);
            return Err(err);
        }
        let name = compound.name.as_str();
        let builder = samples
            .par_iter()
            .map(|s| CalibrationBuilder::new(name).add_sample(s.concentration, s.ions))
            .reduce(|| CalibrationBuilder::new(name), CalibrationBuilder::merge);
        self.finish(builder)
    }

    /// Fit an already accumulated builder, logging the outcome
    pub fn finish(&self, builder: CalibrationBuilder) -> Result<CalibrationCurve, CalibrationError> {
        let compound = builder.compound().to_string();
        match builder.finish(&self.config) {
            Ok(curve) => {
                let p = curve.parameters();
                info!(
                    "Calibrated {}: slope {:.4}, intercept {:.4}, R² {:.4} ({})",
                    compound,
                    p.slope,
                    p.intercept,
                    p.r_squared,
                    p.signal_method()
                );
                Ok(curve)
            }
            Err(e) => {
                error!("{}", e);
                Err(e)
            }
        }
    }

    /// Concentration (mM) for a raw signal
    pub fn apply_curve(&self, curve: &CalibrationCurve, signal: f64) -> f64 {
        curve.concentration_for(signal)
    }

    /// Concentration (mM) for a sample's ion results, using the curve's
    /// signal method
    pub fn quantify(&self, curve: &CalibrationCurve, ions: &[IonResult]) -> f64 {
        curve.quantify(ions)
    }
}
