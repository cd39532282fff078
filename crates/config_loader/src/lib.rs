//! # Config Loader
//!
//! Calibration document loading and parsing module.
//!
//! Responsibilities:
//! - Read the per-recording calibration file (JSON)
//! - Parse it into a `CalibrationTable`
//! - Validate rule shapes eagerly and report suspicious tables
//!
//! # Example
//!
//! ```no_run
//! use config_loader::CalibrationLoader;
//! use std::path::Path;
//!
//! let table = CalibrationLoader::load_from_path(Path::new("timeconvs.json")).unwrap();
//! println!("rs -> dvs rules: {}", table.rs_to_dvs.len());
//! ```

mod parser;
mod validator;

pub use contracts::CalibrationTable;
pub use validator::{ValidationReport, ValidationWarning};

use contracts::ContractError;
use std::path::Path;
use tracing::{debug, warn};

/// Calibration loader
///
/// Provides static methods to load calibration from files or strings.
pub struct CalibrationLoader;

impl CalibrationLoader {
    /// Load calibration from file path
    ///
    /// Validation warnings are logged, not returned.
    ///
    /// # Errors
    /// - File read failure
    /// - Parse failure
    /// - Malformed interval rule
    pub fn load_from_path(path: &Path) -> Result<CalibrationTable, ContractError> {
        let (table, _) = Self::check_path(path)?;
        Ok(table)
    }

    /// Load calibration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Malformed interval rule
    pub fn load_from_str(content: &str) -> Result<CalibrationTable, ContractError> {
        let (table, _) = Self::check_str(content)?;
        Ok(table)
    }

    /// Load calibration from file path, returning the validation report too
    pub fn check_path(path: &Path) -> Result<(CalibrationTable, ValidationReport), ContractError> {
        debug!(path = %path.display(), "Reading calibration file");
        let content = Self::read_file(path)?;
        Self::check_str(&content)
    }

    /// Load calibration from string, returning the validation report too
    pub fn check_str(content: &str) -> Result<(CalibrationTable, ValidationReport), ContractError> {
        let table = parser::parse_json(content)?;
        let report = Self::validate(&table)?;
        debug!(
            rules = table.rule_count(),
            warnings = report.warnings.len(),
            "Calibration parsed"
        );
        Ok((table, report))
    }

    /// Validate an already-built table, logging every warning
    pub fn validate(table: &CalibrationTable) -> Result<ValidationReport, ContractError> {
        let report = validator::validate(table)?;
        for warning in &report.warnings {
            warn!(%warning, "Calibration warning");
        }
        Ok(report)
    }
}

impl CalibrationLoader {
    /// Read calibration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
