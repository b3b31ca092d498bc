use crate::stats::StatsError;

/// Errors raised while building or applying calibration curves
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrationError {
    /// A concentration string could not be parsed
    #[error("Invalid concentration '{0}'")]
    InvalidConcentration(String),

    /// The compound has no ion targets
    #[error("No ions found for compound {0}")]
    NoIons(String),

    /// Fewer than two calibration points were collected
    #[error("Not enough calibration points for {compound}: {got} (need at least 2)")]
    TooFewPoints {
        /// Compound name
        compound: String,
        /// Number of points collected
        got: usize,
    },

    /// The regression could not be computed
    #[error("Regression failed for {compound}: {source}")]
    Regression {
        /// Compound name
        compound: String,
        /// Underlying numerical error
        source: StatsError,
    },

    /// The fitted slope is zero or not finite, so concentrations cannot be
    /// back-calculated
    #[error("Unusable slope {slope} for {compound}")]
    DegenerateSlope {
        /// Compound name
        compound: String,
        /// Fitted slope
        slope: f64,
    },

    /// Both signal methods fit below the acceptance threshold
    #[error("Calibration for {compound} too poor: R² {r_squared:.3}")]
    PoorFit {
        /// Compound name
        compound: String,
        /// Best R² achieved
        r_squared: f64,
    },
}
