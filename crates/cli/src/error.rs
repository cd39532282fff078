//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Calibration file not found
    #[error("Calibration file not found: {path}")]
    CalibrationNotFound { path: String },

    /// A line of timestamp input is not a number
    #[error("Invalid timestamp on input line {line}: '{value}'")]
    InvalidTimestamp { line: usize, value: String },

    /// No timestamps on the command line nor on stdin
    #[error("No timestamps to convert")]
    NoInput,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn calibration_not_found(path: impl Into<String>) -> Self {
        Self::CalibrationNotFound { path: path.into() }
    }

    pub fn invalid_timestamp(line: usize, value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            line,
            value: value.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
