//! Calibration document parsing.
//!
//! The document is JSON: rule tables use `null` for unbounded interval ends,
//! which rules out formats without a null value.

use contracts::{CalibrationTable, ContractError};

/// Parse a JSON calibration document
pub fn parse_json(content: &str) -> Result<CalibrationTable, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}
