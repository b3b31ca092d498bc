/// Errors that can occur while writing result tables
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error creating or writing the output
    #[error("Failed to write results: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV write error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}
