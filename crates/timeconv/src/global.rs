//! Free conversion functions over the process-wide `CalibrationStore`.

use std::path::Path;
use std::sync::Arc;

use contracts::{CalibrationTable, ContractError, CrossSensor};

use crate::{CalibrationStore, TimeConverter};

/// Load calibration JSON text into the process-wide store
pub fn load_from_str(content: &str) -> Result<Arc<CalibrationTable>, ContractError> {
    CalibrationStore::global().load_from_str(content)
}

/// Load a calibration file into the process-wide store
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Arc<CalibrationTable>, ContractError> {
    CalibrationStore::global().load_from_path(path)
}

/// Converter over the current process-wide calibration
pub fn converter() -> Result<TimeConverter, ContractError> {
    CalibrationStore::global().converter()
}

/// Map a timestamp through one rule table of the process-wide calibration
pub fn map_value(kind: CrossSensor, x: f64) -> Result<f64, ContractError> {
    converter()?.map_value(kind, x)
}

/// Map a batch through one rule table of the process-wide calibration
pub fn map_values(kind: CrossSensor, xs: &[f64]) -> Result<Vec<f64>, ContractError> {
    converter()?.map_values(kind, xs)
}

macro_rules! global_conversions {
    (@infallible $($name:ident($arg:ty) -> $out:ty;)*) => {
        $(
            #[doc = concat!("`TimeConverter::", stringify!($name), "` on the process-wide calibration")]
            pub fn $name(x: $arg) -> Result<$out, ContractError> {
                Ok(converter()?.$name(x))
            }
        )*
    };
    ($($name:ident($arg:ty) -> $out:ty;)*) => {
        $(
            #[doc = concat!("`TimeConverter::", stringify!($name), "` on the process-wide calibration")]
            pub fn $name(x: $arg) -> Result<$out, ContractError> {
                converter()?.$name(x)
            }
        )*
    };
}

global_conversions! {
    convert_rs_to_dvs(f64) -> f64;
    convert_lidar_to_dvs(f64) -> f64;
    convert_dvs_to_rs(f64) -> f64;
    convert_dvs_to_lidar(f64) -> f64;
    convert_rs_to_dvs_batch(&[f64]) -> Vec<f64>;
    convert_lidar_to_dvs_batch(&[f64]) -> Vec<f64>;
    convert_dvs_to_rs_batch(&[f64]) -> Vec<f64>;
    convert_dvs_to_lidar_batch(&[f64]) -> Vec<f64>;
    dvs_relative_to_native(f64) -> f64;
    lidar_relative_to_native(f64) -> f64;
    rs_relative_to_native(f64) -> f64;
    dvs_relative_to_native_batch(&[f64]) -> Vec<f64>;
    lidar_relative_to_native_batch(&[f64]) -> Vec<f64>;
    rs_relative_to_native_batch(&[f64]) -> Vec<f64>;
}

global_conversions! {
    @infallible
    dvs_native_to_relative(f64) -> f64;
    lidar_native_to_relative(f64) -> f64;
    rs_native_to_relative(f64) -> f64;
    dvs_native_to_relative_batch(&[f64]) -> Vec<f64>;
    lidar_native_to_relative_batch(&[f64]) -> Vec<f64>;
    rs_native_to_relative_batch(&[f64]) -> Vec<f64>;
}
