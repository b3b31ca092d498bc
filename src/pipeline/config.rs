use crate::baseline::BaselineConfig;
use crate::calibration::CalibrationConfig;
use crate::peak::{IntegrationConfig, DEFAULT_RT_TOLERANCE};
use crate::xic::MassTolerance;

/// Settings for a whole quantitation run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Integration settings for extracted-ion chromatograms
    pub ms_integration: IntegrationConfig,

    /// Integration settings for baseline-corrected LC traces
    pub lc_integration: IntegrationConfig,

    /// LC baseline correction settings
    pub baseline: BaselineConfig,

    /// Calibration policy
    pub calibration: CalibrationConfig,

    /// Tolerance applied to every ion without a custom range; `None` keeps
    /// each ion's own tolerance
    pub mass_tolerance: Option<MassTolerance>,

    /// MS level read from the scan files
    pub ms_level: u8,

    /// Window (minutes) for matching LC peaks to ion retention times
    pub rt_tolerance: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ms_integration: IntegrationConfig::ms(),
            lc_integration: IntegrationConfig::lc(),
            baseline: BaselineConfig::default(),
            calibration: CalibrationConfig::default(),
            mass_tolerance: None,
            ms_level: 1,
            rt_tolerance: DEFAULT_RT_TOLERANCE,
        }
    }
}
