use serde::{Deserialize, Serialize};

use super::PeakIntegrationError;

/// Minimum number of samples a trace needs for boundary-detected integration
pub const MIN_INTEGRATION_SAMPLES: usize = 5;

/// Parameters for [`PeakIntegrator`](super::PeakIntegrator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Narrowest accepted peak in minutes; narrower windows are widened
    pub min_peak_width: f64,

    /// Furthest a boundary walk may go from the apex, in minutes
    pub max_peak_width: f64,

    /// Absolute intensity floor used in boundary detection
    pub noise_threshold: f64,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self::ms()
    }
}

impl IntegrationConfig {
    /// Defaults for extracted-ion chromatograms
    pub fn ms() -> Self {
        Self {
            min_peak_width: 0.1,
            max_peak_width: 5.0,
            noise_threshold: 1000.0,
        }
    }

    /// Defaults for baseline-corrected LC absorbance traces
    pub fn lc() -> Self {
        Self {
            min_peak_width: 0.05,
            max_peak_width: 2.0,
            noise_threshold: 10.0,
        }
    }

    /// Same limits with a different noise threshold
    pub fn with_noise_threshold(mut self, noise_threshold: f64) -> Self {
        self.noise_threshold = noise_threshold;
        self
    }

    /// Width used by the fixed-width boundary fallback
    pub fn fallback_width(&self) -> f64 {
        (self.min_peak_width + self.max_peak_width) / 2.0
    }

    /// Reject negative, non-finite or inverted widths
    pub fn validate(&self) -> Result<(), PeakIntegrationError> {
        let finite = self.min_peak_width.is_finite()
            && self.max_peak_width.is_finite()
            && self.noise_threshold.is_finite();
        if !finite {
            return Err(PeakIntegrationError::InvalidConfig(
                "widths and noise threshold must be finite".to_string(),
            ));
        }
        if self.min_peak_width < 0.0 || self.max_peak_width <= 0.0 {
            return Err(PeakIntegrationError::InvalidConfig(format!(
                "peak widths must be positive (min {}, max {})",
                self.min_peak_width, self.max_peak_width
            )));
        }
        if self.min_peak_width > self.max_peak_width {
            return Err(PeakIntegrationError::InvalidConfig(format!(
                "min_peak_width {} exceeds max_peak_width {}",
                self.min_peak_width, self.max_peak_width
            )));
        }
        Ok(())
    }
}
