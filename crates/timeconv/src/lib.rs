//! # Timeconv
//!
//! Timestamp conversion between the DVS event camera, the lidar and the
//! RealSense depth camera of a recording.
//!
//! Two formats exist per sensor:
//! - native: raw sensor ticks (us for DVS, ns for lidar, ms for RealSense)
//!   with an arbitrary initial offset
//! - relative: seconds since recording start
//!
//! Cross-sensor conversions go through piecewise-linear rule tables
//! (`mapper`), native <-> relative conversions are a single affine formula
//! per sensor (`affine`). Both read the calibration held by a
//! `CalibrationStore`.
//!
//! ## Example
//!
//! ```no_run
//! timeconv::load_from_file("timeconvs.json").unwrap();
//!
//! let dvs_us = timeconv::convert_rs_to_dvs(1_234.5).unwrap();
//! let seconds = timeconv::dvs_native_to_relative(dvs_us).unwrap();
//! # let _ = seconds;
//! ```

pub mod affine;
mod converter;
mod global;
pub mod mapper;
mod store;

pub use converter::TimeConverter;
pub use global::*;
pub use mapper::{map_batch, map_scalar, rule_matches, IntervalMapper};
pub use store::CalibrationStore;

pub use contracts::{
    CalibrationTable, ContractError, Conversion, ConversionStep, CrossSensor, Endpoint,
    IntervalRule, RuleBounds, Sensor, SensorClock, TimeFormat,
};
