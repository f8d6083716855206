//! Telemetry ingestion error types.

use thiserror::Error;

/// Errors raised while reading or parsing a diagnostic log.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Upload rejected before parsing (wrong extension, unusable header).
    #[error("invalid upload: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("source not found: {0}")]
    NotFound(String),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("no recognized OBD-II columns in header")]
    NoRecognizedColumns,

    #[error("file is empty")]
    Empty,
}

impl TelemetryError {
    /// True for errors caused by the file's content rather than its access.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::NoRecognizedColumns | Self::Empty
        )
    }
}

/// Convenience alias for telemetry results.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
