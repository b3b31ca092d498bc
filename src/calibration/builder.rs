use log::{debug, warn};

use super::curve::{CalibrationCurve, CalibrationParameters, CalibrationPoint};
use super::signal::SignalMethod;
use super::{CalibrationConfig, CalibrationError};
use crate::compound::IonResult;
use crate::stats::{self, LinearFit};

/// Collects a compound's calibration points and fits the curve once every
/// standard has been seen.
///
/// The builder is passed by value so per-file work can produce partial
/// builders that are merged before fitting:
///
/// ```
/// use lcquant::calibration::{CalibrationBuilder, CalibrationConfig, CalibrationPoint};
///
/// let point = |c: f64| CalibrationPoint {
///     concentration: c,
///     peak_area_signal: 100.0 * c + 5.0,
///     intensity_sum_signal: 300.0 * c,
/// };
/// let curve = CalibrationBuilder::new("Alanine")
///     .add_point(point(1.0))
///     .merge(CalibrationBuilder::new("Alanine").add_point(point(2.0)))
///     .finish(&CalibrationConfig::default())
///     .unwrap();
/// assert!(curve.use_peak_area());
/// assert!((curve.parameters().slope - 100.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationBuilder {
    compound: String,
    points: Vec<CalibrationPoint>,
}

impl CalibrationBuilder {
    /// Empty builder for `compound`
    pub fn new(compound: impl Into<String>) -> Self {
        Self {
            compound: compound.into(),
            points: Vec::new(),
        }
    }

    /// Compound name
    pub fn compound(&self) -> &str {
        &self.compound
    }

    /// Add a point; a point at an already-present concentration replaces it
    pub fn add_point(mut self, point: CalibrationPoint) -> Self {
        match self
            .points
            .iter_mut()
            .find(|p| p.concentration == point.concentration)
        {
            Some(existing) => *existing = point,
            None => self.points.push(point),
        }
        self
    }

    /// Add a point computed from one standard's ion results
    pub fn add_sample(self, concentration: f64, ions: &[IonResult]) -> Self {
        self.add_point(CalibrationPoint::from_ions(concentration, ions))
    }

    /// Absorb the points of another builder, in its order
    pub fn merge(self, other: CalibrationBuilder) -> Self {
        other.points.into_iter().fold(self, Self::add_point)
    }

    /// Points collected so far
    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    /// Number of distinct concentrations
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no point was added
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fit the curve.
    ///
    /// Peak-area signals are fitted first; when their R² falls below
    /// `config.r_squared_threshold` every point is refitted with intensity
    /// sums and the curve records that method.
    pub fn finish(self, config: &CalibrationConfig) -> Result<CalibrationCurve, CalibrationError> {
        if self.points.len() < 2 {
            return Err(CalibrationError::TooFewPoints {
                compound: self.compound,
                got: self.points.len(),
            });
        }

        let mut fit = self.fit(SignalMethod::PeakArea)?;
        let mut use_peak_area = true;
        debug!(
            "{}: peak-area fit R² = {:.4}",
            self.compound,
            fit.r_squared()
        );

        if fit.r_squared() < config.r_squared_threshold {
            warn!(
                "Low R² ({:.2}) for {} with peak areas. Falling back to intensity sum.",
                fit.r_squared(),
                self.compound
            );
            fit = self.fit(SignalMethod::IntensitySum)?;
            use_peak_area = false;
            if fit.r_squared() < config.min_fallback_r_squared {
                return Err(CalibrationError::PoorFit {
                    compound: self.compound,
                    r_squared: fit.r_squared(),
                });
            }
        }

        if !fit.slope.is_finite() || fit.slope == 0.0 {
            return Err(CalibrationError::DegenerateSlope {
                compound: self.compound,
                slope: fit.slope,
            });
        }

        let parameters = CalibrationParameters::from_fit(&fit, use_peak_area);
        Ok(CalibrationCurve::new(self.compound, &self.points, parameters))
    }

    fn fit(&self, method: SignalMethod) -> Result<LinearFit, CalibrationError> {
        let x: Vec<f64> = self.points.iter().map(|p| p.concentration).collect();
        let y: Vec<f64> = self.points.iter().map(|p| p.signal(method)).collect();
        stats::linear_regression(&x, &y).map_err(|source| CalibrationError::Regression {
            compound: self.compound.clone(),
            source,
        })
    }
}
