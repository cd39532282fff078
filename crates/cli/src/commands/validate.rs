//! `validate` command implementation.

use anyhow::{Context, Result};
use config_loader::CalibrationLoader;
use contracts::{CalibrationTable, CrossSensor};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    calibration_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<CalibrationSummary>,
}

#[derive(Serialize)]
struct CalibrationSummary {
    rs_to_dvs_rules: usize,
    lidar_to_dvs_rules: usize,
    dvs_to_rs_rules: usize,
    dvs_to_lidar_rules: usize,
}

impl From<&CalibrationTable> for CalibrationSummary {
    fn from(table: &CalibrationTable) -> Self {
        Self {
            rs_to_dvs_rules: table.rules(CrossSensor::RsToDvs).len(),
            lidar_to_dvs_rules: table.rules(CrossSensor::LidarToDvs).len(),
            dvs_to_rs_rules: table.rules(CrossSensor::DvsToRs).len(),
            dvs_to_lidar_rules: table.rules(CrossSensor::DvsToLidar).len(),
        }
    }
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(calibration = %args.calibration.display(), "Validating calibration");

    let result = validate_calibration(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Calibration validation failed")
    }
}

fn validate_calibration(args: &ValidateArgs) -> ValidationResult {
    let calibration_path = args.calibration.display().to_string();

    if let Err(e) = super::ensure_calibration_exists(&args.calibration) {
        return ValidationResult {
            valid: false,
            calibration_path,
            error: Some(e.to_string()),
            warnings: Vec::new(),
            summary: None,
        };
    }

    match CalibrationLoader::check_path(&args.calibration) {
        Ok((table, report)) => {
            let warnings: Vec<String> = report.warnings.iter().map(|w| w.to_string()).collect();
            let valid = !(args.strict && !warnings.is_empty());
            ValidationResult {
                valid,
                calibration_path,
                error: (!valid).then(|| "warnings present in strict mode".to_string()),
                warnings,
                summary: Some(CalibrationSummary::from(&table)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            calibration_path,
            error: Some(e.to_string()),
            warnings: Vec::new(),
            summary: None,
        },
    }
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Calibration is valid: {}", result.calibration_path);
    } else {
        println!("✗ Calibration is invalid: {}", result.calibration_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }

    if let Some(ref summary) = result.summary {
        println!("\n  rs_to_dvs rules: {}", summary.rs_to_dvs_rules);
        println!("  lidar_to_dvs rules: {}", summary.lidar_to_dvs_rules);
        println!("  dvs_to_rs rules: {}", summary.dvs_to_rs_rules);
        println!("  dvs_to_lidar rules: {}", summary.dvs_to_lidar_rules);
    }

    if !result.warnings.is_empty() {
        println!("\n⚠ Warnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    const GAPPY_JSON: &str = r#"{
        "rs_to_dvs": [{"interval": [null, 10.0], "inner": false, "conv_k": 2.0, "conv_b": 1.0}],
        "lidar_to_dvs": [{"interval": [null, 0.0], "inner": false, "conv_k": 1.0, "conv_b": 0.0},
                         {"interval": [0.0, null], "inner": false, "conv_k": 1.0, "conv_b": 0.0}],
        "dvs_to_rs": [{"interval": [null, 0.0], "inner": false, "conv_k": 1.0, "conv_b": 0.0},
                      {"interval": [0.0, null], "inner": false, "conv_k": 1.0, "conv_b": 0.0}],
        "dvs_to_lidar": [{"interval": [null, 0.0], "inner": false, "conv_k": 1.0, "conv_b": 0.0},
                         {"interval": [0.0, null], "inner": false, "conv_k": 1.0, "conv_b": 0.0}],
        "dvs_timestamp_scale": 1e-6, "dvs_offset_s": 0.0,
        "lidar_timestamp_scale": 1e-9, "lidar_offset_s": 0.0,
        "rs_timestamp_scale": 1e-3, "rs_offset_s": 0.0
    }"#;

    fn write_calibration(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn args(path: PathBuf, strict: bool) -> ValidateArgs {
        ValidateArgs {
            calibration: path,
            strict,
            json: false,
        }
    }

    #[test]
    fn test_valid_with_warning() {
        let file = write_calibration(GAPPY_JSON);
        let result = validate_calibration(&args(file.path().to_path_buf(), false));
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.summary.unwrap().rs_to_dvs_rules, 1);
    }

    #[test]
    fn test_strict_rejects_warnings() {
        let file = write_calibration(GAPPY_JSON);
        let result = validate_calibration(&args(file.path().to_path_buf(), true));
        assert!(!result.valid);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_missing_file() {
        let result = validate_calibration(&args(PathBuf::from("/nonexistent.json"), false));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("not found"));
    }

    #[test]
    fn test_malformed_rule() {
        let content = GAPPY_JSON.replacen("[null, 10.0]", "[1.0, 10.0]", 1);
        let file = write_calibration(&content);
        let result = validate_calibration(&args(file.path().to_path_buf(), false));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("rs_to_dvs[0]"));
    }
}
