use crate::trace::TraceError;

/// Errors raised by peak integration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PeakIntegrationError {
    /// Fewer samples than integration requires
    #[error("Insufficient data points: {got} (need at least {required})")]
    InsufficientData {
        /// Minimum number of samples
        required: usize,
        /// Number of samples supplied
        got: usize,
    },

    /// Boundary walk produced an unusable window
    #[error("Peak boundaries could not be detected: {0}")]
    BoundaryDetection(String),

    /// Width limits are inverted, negative or not finite
    #[error("Invalid integration config: {0}")]
    InvalidConfig(String),

    /// The input trace failed validation
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),
}
