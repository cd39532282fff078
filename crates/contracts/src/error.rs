//! Layered error definitions
//!
//! Categorized by source: calibration / mapping / arguments / io

use thiserror::Error;

use crate::Sensor;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Calibration Errors =====
    /// Conversion requested before any calibration was loaded
    #[error("calibration not initialized: load a calibration document first")]
    NotInitialized,

    /// Calibration document parse error
    #[error("calibration parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== Mapping Errors =====
    /// Interval rule is neither inner-bounded nor correctly single-sided.
    /// `table`/`index` are absent for a rule checked on its own.
    #[error("invalid interval rule{}: {message}", rule_location(.table, .index))]
    InvalidRule {
        table: Option<String>,
        index: Option<usize>,
        message: String,
    },

    /// Scalar timestamp is not covered by any rule of the table
    #[error("no interval of '{table}' contains timestamp {value}")]
    NoMatchingInterval { table: String, value: f64 },

    /// Zero timestamp scale in a relative -> native conversion
    #[error("division by zero: {sensor} timestamp scale is 0")]
    Division { sensor: Sensor },

    // ===== General Errors =====
    /// Malformed user input (sensor names, formats, timestamps)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn rule_location(table: &Option<String>, index: &Option<usize>) -> String {
    match (table, index) {
        (Some(table), Some(index)) => format!(" {table}[{index}]"),
        _ => String::new(),
    }
}

impl ContractError {
    /// Create calibration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create invalid rule error for `table[index]`
    pub fn invalid_rule(table: impl Into<String>, index: usize, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            table: Some(table.into()),
            index: Some(index),
            message: message.into(),
        }
    }

    /// Create invalid rule error for a rule outside any table
    pub fn malformed_rule(message: impl Into<String>) -> Self {
        Self::InvalidRule {
            table: None,
            index: None,
            message: message.into(),
        }
    }

    /// Create no-matching-interval error
    pub fn no_matching_interval(table: impl Into<String>, value: f64) -> Self {
        Self::NoMatchingInterval {
            table: table.into(),
            value,
        }
    }

    /// Create invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
