//! TimeConverter - conversions over one calibration snapshot

use std::sync::Arc;

use contracts::{
    CalibrationTable, ContractError, Conversion, ConversionStep, CrossSensor, Sensor,
};
use tracing::trace;

use crate::affine;
use crate::mapper::IntervalMapper;

/// Conversion handle bound to one calibration snapshot
///
/// Reloading the store does not affect an existing converter, so a sequence
/// of calls on one converter always uses the same table.
#[derive(Debug, Clone)]
pub struct TimeConverter {
    table: Arc<CalibrationTable>,
}

impl TimeConverter {
    pub fn new(table: Arc<CalibrationTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CalibrationTable {
        &self.table
    }

    /// Mapper over one of the four rule tables
    pub fn mapper(&self, kind: CrossSensor) -> IntervalMapper<'_> {
        IntervalMapper::named(kind.key(), self.table.rules(kind))
    }

    /// Map one native timestamp through a rule table
    pub fn map_value(&self, kind: CrossSensor, x: f64) -> Result<f64, ContractError> {
        let result = self.mapper(kind).map_scalar(x);
        match &result {
            Ok(y) => {
                trace!(table = %kind, x, y, "Mapped timestamp");
                observability::record_conversion(kind, 1);
            }
            Err(ContractError::NoMatchingInterval { .. }) => observability::record_no_match(kind),
            Err(_) => {}
        }
        result
    }

    /// Map native timestamps through a rule table, unmatched positions become `0.0`
    pub fn map_values(&self, kind: CrossSensor, xs: &[f64]) -> Result<Vec<f64>, ContractError> {
        let ys = self.mapper(kind).map_batch(xs)?;
        trace!(table = %kind, count = xs.len(), "Mapped timestamp batch");
        observability::record_conversion(kind, xs.len());
        Ok(ys)
    }

    pub fn to_relative(&self, sensor: Sensor, native: f64) -> f64 {
        affine::native_to_relative(&self.table.clock(sensor), native)
    }

    pub fn to_native(&self, sensor: Sensor, relative: f64) -> Result<f64, ContractError> {
        affine::relative_to_native(&self.table.clock(sensor), relative)
    }

    pub fn to_relative_batch(&self, sensor: Sensor, natives: &[f64]) -> Vec<f64> {
        affine::native_to_relative_batch(&self.table.clock(sensor), natives)
    }

    pub fn to_native_batch(
        &self,
        sensor: Sensor,
        relatives: &[f64],
    ) -> Result<Vec<f64>, ContractError> {
        affine::relative_to_native_batch(&self.table.clock(sensor), relatives)
    }

    /// Run an arbitrary conversion plan on one timestamp
    pub fn convert(&self, plan: &Conversion, x: f64) -> Result<f64, ContractError> {
        plan.steps()
            .into_iter()
            .try_fold(x, |value, step| match step {
                ConversionStep::ToRelative(sensor) => Ok(self.to_relative(sensor, value)),
                ConversionStep::ToNative(sensor) => self.to_native(sensor, value),
                ConversionStep::Table(kind) => self.map_value(kind, value),
            })
    }

    /// Run an arbitrary conversion plan on a batch
    pub fn convert_batch(&self, plan: &Conversion, xs: &[f64]) -> Result<Vec<f64>, ContractError> {
        plan.steps()
            .into_iter()
            .try_fold(xs.to_vec(), |values, step| match step {
                ConversionStep::ToRelative(sensor) => Ok(self.to_relative_batch(sensor, &values)),
                ConversionStep::ToNative(sensor) => self.to_native_batch(sensor, &values),
                ConversionStep::Table(kind) => self.map_values(kind, &values),
            })
    }
}

/// Named scalar + batch methods over one rule table
macro_rules! table_conversions {
    ($($(#[$doc:meta])* $name:ident, $batch:ident => $kind:expr;)*) => {
        impl TimeConverter {
            $(
                $(#[$doc])*
                pub fn $name(&self, x: f64) -> Result<f64, ContractError> {
                    self.map_value($kind, x)
                }

                $(#[$doc])*
                pub fn $batch(&self, xs: &[f64]) -> Result<Vec<f64>, ContractError> {
                    self.map_values($kind, xs)
                }
            )*
        }
    };
}

/// Named native <-> relative methods of one sensor clock
macro_rules! clock_conversions {
    ($($sensor:expr => $to_rel:ident, $to_rel_batch:ident, $to_native:ident, $to_native_batch:ident;)*) => {
        impl TimeConverter {
            $(
                pub fn $to_rel(&self, native: f64) -> f64 {
                    self.to_relative($sensor, native)
                }

                pub fn $to_rel_batch(&self, natives: &[f64]) -> Vec<f64> {
                    self.to_relative_batch($sensor, natives)
                }

                pub fn $to_native(&self, relative: f64) -> Result<f64, ContractError> {
                    self.to_native($sensor, relative)
                }

                pub fn $to_native_batch(&self, relatives: &[f64]) -> Result<Vec<f64>, ContractError> {
                    self.to_native_batch($sensor, relatives)
                }
            )*
        }
    };
}

table_conversions! {
    /// RealSense native (ms) -> DVS native (us)
    convert_rs_to_dvs, convert_rs_to_dvs_batch => CrossSensor::RsToDvs;
    /// Lidar native (ns) -> DVS native (us)
    convert_lidar_to_dvs, convert_lidar_to_dvs_batch => CrossSensor::LidarToDvs;
    /// DVS native (us) -> RealSense native (ms)
    convert_dvs_to_rs, convert_dvs_to_rs_batch => CrossSensor::DvsToRs;
    /// DVS native (us) -> lidar native (ns)
    convert_dvs_to_lidar, convert_dvs_to_lidar_batch => CrossSensor::DvsToLidar;
}

clock_conversions! {
    Sensor::Dvs => dvs_native_to_relative, dvs_native_to_relative_batch,
        dvs_relative_to_native, dvs_relative_to_native_batch;
    Sensor::Lidar => lidar_native_to_relative, lidar_native_to_relative_batch,
        lidar_relative_to_native, lidar_relative_to_native_batch;
    Sensor::Rs => rs_native_to_relative, rs_native_to_relative_batch,
        rs_relative_to_native, rs_relative_to_native_batch;
}
