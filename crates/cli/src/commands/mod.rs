//! Command implementations.

mod convert;
mod info;
mod validate;

pub use convert::run_convert;
pub use info::run_info;
pub use validate::run_validate;

use std::path::Path;

use crate::error::CliError;

/// Fail early with a readable message when the calibration file is missing
fn ensure_calibration_exists(path: &Path) -> Result<(), CliError> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::calibration_not_found(path.display().to_string()))
    }
}
