//! TOML configuration file support for power users.
//!
//! Instead of passing many CLI flags, users can specify settings in a config file:
//!
//! ```toml
//! # lcquant.toml
//! [ms_integration]
//! noise_threshold = 500.0
//!
//! [lc_integration]
//! min_peak_width = 0.05
//! max_peak_width = 2.0
//!
//! [xic]
//! tolerance_ppm = 5.0
//! ms_level = 1
//!
//! [baseline]
//! iterations = 20
//!
//! [calibration]
//! r_squared_threshold = 0.75
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use lcquant::peak::IntegrationConfig;
use lcquant::pipeline::PipelineConfig;
use lcquant::xic::MassTolerance;

/// Root configuration structure for lcquant.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Integration settings for extracted-ion chromatograms.
    #[serde(default)]
    pub ms_integration: IntegrationSection,

    /// Integration settings for LC traces.
    #[serde(default)]
    pub lc_integration: IntegrationSection,

    /// Ion extraction settings.
    #[serde(default)]
    pub xic: XicSection,

    /// LC baseline settings.
    #[serde(default)]
    pub baseline: BaselineSection,

    /// Calibration policy.
    #[serde(default)]
    pub calibration: CalibrationSection,
}

/// Peak integration overrides.
#[derive(Debug, Default, Deserialize)]
pub struct IntegrationSection {
    /// Narrowest accepted peak in minutes.
    pub min_peak_width: Option<f64>,

    /// Furthest a boundary may be from the apex, in minutes.
    pub max_peak_width: Option<f64>,

    /// Absolute intensity floor for boundary detection.
    pub noise_threshold: Option<f64>,
}

/// XIC extraction overrides.
#[derive(Debug, Default, Deserialize)]
pub struct XicSection {
    /// Absolute half-width in Da applied to every ion.
    pub tolerance_da: Option<f64>,

    /// Relative half-width in ppm applied to every ion.
    pub tolerance_ppm: Option<f64>,

    /// MS level read from scan files.
    pub ms_level: Option<u8>,

    /// Window (minutes) for matching LC peaks to ion retention times.
    pub rt_tolerance: Option<f64>,
}

/// Baseline correction overrides.
#[derive(Debug, Default, Deserialize)]
pub struct BaselineSection {
    /// Number of filter passes.
    pub iterations: Option<usize>,
}

/// Calibration overrides.
#[derive(Debug, Default, Deserialize)]
pub struct CalibrationSection {
    /// Below this R² the fit falls back to intensity sums.
    pub r_squared_threshold: Option<f64>,

    /// Fallback fits below this R² are rejected.
    pub min_fallback_r_squared: Option<f64>,
}

impl IntegrationSection {
    fn apply(&self, config: &mut IntegrationConfig) {
        if let Some(v) = self.min_peak_width {
            config.min_peak_width = v;
        }
        if let Some(v) = self.max_peak_width {
            config.max_peak_width = v;
        }
        if let Some(v) = self.noise_threshold {
            config.noise_threshold = v;
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Apply every set field onto `base`.
    pub fn apply(&self, mut base: PipelineConfig) -> Result<PipelineConfig> {
        self.ms_integration.apply(&mut base.ms_integration);
        self.lc_integration.apply(&mut base.lc_integration);

        base.mass_tolerance = match (self.xic.tolerance_da, self.xic.tolerance_ppm) {
            (Some(_), Some(_)) => bail!("Set either tolerance_da or tolerance_ppm, not both"),
            (Some(da), None) => Some(MassTolerance::Absolute(da)),
            (None, Some(ppm)) => Some(MassTolerance::Ppm(ppm)),
            (None, None) => base.mass_tolerance,
        };
        if let Some(level) = self.xic.ms_level {
            base.ms_level = level;
        }
        if let Some(rt) = self.xic.rt_tolerance {
            base.rt_tolerance = rt;
        }
        if let Some(iterations) = self.baseline.iterations {
            base.baseline.iterations = iterations;
        }
        if let Some(v) = self.calibration.r_squared_threshold {
            base.calibration.r_squared_threshold = v;
        }
        if let Some(v) = self.calibration.min_fallback_r_squared {
            base.calibration.min_fallback_r_squared = v;
        }
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [ms_integration]
            noise_threshold = 500.0

            [lc_integration]
            max_peak_width = 1.5

            [xic]
            tolerance_ppm = 5.0
            ms_level = 2

            [baseline]
            iterations = 30

            [calibration]
            r_squared_threshold = 0.9
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.ms_integration.noise_threshold, Some(500.0));
        assert_eq!(config.xic.tolerance_ppm, Some(5.0));
        assert_eq!(config.baseline.iterations, Some(30));

        let applied = config.apply(PipelineConfig::default()).unwrap();
        assert_eq!(applied.ms_integration.noise_threshold, 500.0);
        assert_eq!(applied.ms_integration.min_peak_width, 0.1);
        assert_eq!(applied.lc_integration.max_peak_width, 1.5);
        assert_eq!(applied.mass_tolerance, Some(MassTolerance::Ppm(5.0)));
        assert_eq!(applied.ms_level, 2);
        assert_eq!(applied.baseline.iterations, 30);
        assert_eq!(applied.calibration.r_squared_threshold, 0.9);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.xic.ms_level, None);
        assert_eq!(
            config.apply(PipelineConfig::default()).unwrap(),
            PipelineConfig::default()
        );
    }

    #[test]
    fn test_conflicting_tolerances() {
        let config = Config::from_str("[xic]\ntolerance_da = 0.01\ntolerance_ppm = 5.0\n").unwrap();
        assert!(config.apply(PipelineConfig::default()).is_err());
    }
}
