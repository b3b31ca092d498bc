use serde::{Deserialize, Serialize};

use super::signal::{compound_signal, SignalMethod};
use crate::compound::IonResult;
use crate::stats::{self, LinearFit};

/// Decimal places kept in back-calculated concentrations
pub const CONCENTRATION_DECIMALS: u32 = 6;

/// One calibration standard's contribution to a compound's curve.
///
/// Both candidate signals are stored so the curve can switch methods
/// without revisiting the source files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    /// Known concentration in mM
    pub concentration: f64,
    /// Compound signal under [`SignalMethod::PeakArea`]
    pub peak_area_signal: f64,
    /// Compound signal under [`SignalMethod::IntensitySum`]
    pub intensity_sum_signal: f64,
}

impl CalibrationPoint {
    /// Point computed from a compound's per-ion results
    pub fn from_ions(concentration: f64, ions: &[IonResult]) -> Self {
        Self {
            concentration,
            peak_area_signal: compound_signal(ions, SignalMethod::PeakArea).value,
            intensity_sum_signal: compound_signal(ions, SignalMethod::IntensitySum).value,
        }
    }

    /// Signal under `method`
    pub fn signal(&self, method: SignalMethod) -> f64 {
        match method {
            SignalMethod::PeakArea => self.peak_area_signal,
            SignalMethod::IntensitySum => self.intensity_sum_signal,
        }
    }
}

/// Fitted line `signal = slope * concentration + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationParameters {
    /// Slope
    pub slope: f64,
    /// Intercept
    pub intercept: f64,
    /// Pearson correlation coefficient
    pub r_value: f64,
    /// Coefficient of determination
    pub r_squared: f64,
    /// Two-sided p-value for a zero slope
    pub p_value: f64,
    /// Standard error of the slope
    pub std_err: f64,
    /// Whether the fit used peak areas; false means intensity sums
    pub use_peak_area: bool,
}

impl CalibrationParameters {
    /// Parameters from a regression fit
    pub fn from_fit(fit: &LinearFit, use_peak_area: bool) -> Self {
        Self {
            slope: fit.slope,
            intercept: fit.intercept,
            r_value: fit.r_value,
            r_squared: fit.r_squared(),
            p_value: fit.p_value,
            std_err: fit.std_err,
            use_peak_area,
        }
    }

    /// Signal method new samples must be measured with
    pub fn signal_method(&self) -> SignalMethod {
        SignalMethod::from_peak_area_flag(self.use_peak_area)
    }

    /// Concentration (mM) for `signal`, rounded to six decimals.
    ///
    /// Non-finite results and negative concentrations are reported as 0.
    pub fn concentration_for(&self, signal: f64) -> f64 {
        let concentration = (signal - self.intercept) / self.slope;
        if !concentration.is_finite() || concentration <= 0.0 {
            return 0.0;
        }
        let rounded = stats::round_to(concentration, CONCENTRATION_DECIMALS);
        if rounded > 0.0 {
            rounded
        } else {
            0.0
        }
    }
}

/// A compound's finished calibration: its points ordered by concentration
/// together with the fitted parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationCurve {
    /// Compound name
    pub compound: String,
    points: Vec<(f64, f64)>,
    parameters: CalibrationParameters,
}

impl CalibrationCurve {
    pub(crate) fn new(
        compound: String,
        points: &[CalibrationPoint],
        parameters: CalibrationParameters,
    ) -> Self {
        let method = parameters.signal_method();
        let mut points: Vec<(f64, f64)> = points
            .iter()
            .map(|p| (p.concentration, p.signal(method)))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            compound,
            points,
            parameters,
        }
    }

    /// `(concentration, signal)` pairs in ascending concentration
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Fitted parameters
    pub fn parameters(&self) -> &CalibrationParameters {
        &self.parameters
    }

    /// Whether the curve was fitted on peak areas
    pub fn use_peak_area(&self) -> bool {
        self.parameters.use_peak_area
    }

    /// Concentration for a raw signal
    pub fn concentration_for(&self, signal: f64) -> f64 {
        self.parameters.concentration_for(signal)
    }

    /// Concentration for a sample's ion results, measured with the same
    /// signal method the curve was fitted with
    pub fn quantify(&self, ions: &[IonResult]) -> f64 {
        let signal = compound_signal(ions, self.parameters.signal_method());
        self.concentration_for(signal.value)
    }
}
