use crate::trace::TraceError;

/// Errors raised while loading measurements and run inputs
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error reading a file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// No field separator could be detected in a chromatogram file
    #[error("No recognizable delimiter in {0}")]
    NoDelimiter(String),

    /// The chromatogram has no numeric rows
    #[error("No numeric samples in {0}")]
    NoSamples(String),

    /// The chromatogram samples do not form a valid trace
    #[error("Invalid chromatogram: {0}")]
    InvalidTrace(#[from] TraceError),
}
