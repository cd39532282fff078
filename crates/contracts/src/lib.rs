//! # Contracts
//!
//! Shared data model for the timestamp conversion crates.
//! Business crates depend on this crate only, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Native timestamps are raw sensor ticks: microseconds for the DVS event
//!   camera, nanoseconds for the lidar, milliseconds for the RealSense camera
//! - Relative timestamps are seconds (f64) with the recording start at zero

mod calibration;
mod conversion;
mod error;
mod sensor;

pub use calibration::*;
pub use conversion::*;
pub use error::*;
pub use sensor::*;
