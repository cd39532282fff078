//! CalibrationTable - Config Loader output
//!
//! Per-recording clock calibration: four piecewise-linear rule tables between
//! sensor clocks plus one scale/offset pair per sensor.

use serde::{Deserialize, Serialize};

use crate::{CrossSensor, Sensor};

/// Complete calibration of one recording
///
/// Field names match the keys of the calibration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTable {
    /// RealSense native -> DVS native
    pub rs_to_dvs: Vec<IntervalRule>,

    /// Lidar native -> DVS native
    pub lidar_to_dvs: Vec<IntervalRule>,

    /// DVS native -> RealSense native
    pub dvs_to_rs: Vec<IntervalRule>,

    /// DVS native -> lidar native
    pub dvs_to_lidar: Vec<IntervalRule>,

    pub dvs_timestamp_scale: f64,
    pub dvs_offset_s: f64,
    pub lidar_timestamp_scale: f64,
    pub lidar_offset_s: f64,
    pub rs_timestamp_scale: f64,
    pub rs_offset_s: f64,
}

impl CalibrationTable {
    /// Ordered rules of one cross-sensor table
    pub fn rules(&self, table: CrossSensor) -> &[IntervalRule] {
        match table {
            CrossSensor::RsToDvs => &self.rs_to_dvs,
            CrossSensor::LidarToDvs => &self.lidar_to_dvs,
            CrossSensor::DvsToRs => &self.dvs_to_rs,
            CrossSensor::DvsToLidar => &self.dvs_to_lidar,
        }
    }

    /// Scale/offset pair of one sensor
    pub fn clock(&self, sensor: Sensor) -> SensorClock {
        let (scale, offset_s) = match sensor {
            Sensor::Dvs => (self.dvs_timestamp_scale, self.dvs_offset_s),
            Sensor::Lidar => (self.lidar_timestamp_scale, self.lidar_offset_s),
            Sensor::Rs => (self.rs_timestamp_scale, self.rs_offset_s),
        };
        SensorClock {
            sensor,
            scale,
            offset_s,
        }
    }

    /// Total number of interval rules across the four tables
    pub fn rule_count(&self) -> usize {
        CrossSensor::ALL
            .iter()
            .map(|t| self.rules(*t).len())
            .sum()
    }
}

/// Native <-> relative constants of one sensor
///
/// `relative = native * scale - offset_s`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorClock {
    pub sensor: Sensor,
    pub scale: f64,
    pub offset_s: f64,
}

/// One linear mapping valid over one sub-range of the input clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRule {
    /// `(lo, hi)`, `None` meaning unbounded on that side
    pub interval: (Option<f64>, Option<f64>),

    /// Both endpoints present, membership is `lo < t <= hi`
    pub inner: bool,

    pub conv_k: f64,
    pub conv_b: f64,
}

impl IntervalRule {
    /// Rule for `lo < t <= hi`
    pub fn inner(lo: f64, hi: f64, conv_k: f64, conv_b: f64) -> Self {
        Self {
            interval: (Some(lo), Some(hi)),
            inner: true,
            conv_k,
            conv_b,
        }
    }

    /// Rule for `t <= hi`
    pub fn up_to(hi: f64, conv_k: f64, conv_b: f64) -> Self {
        Self {
            interval: (None, Some(hi)),
            inner: false,
            conv_k,
            conv_b,
        }
    }

    /// Rule for `t > lo`
    pub fn after(lo: f64, conv_k: f64, conv_b: f64) -> Self {
        Self {
            interval: (Some(lo), None),
            inner: false,
            conv_k,
            conv_b,
        }
    }

    /// Classify the rule, or explain why it is malformed.
    pub fn bounds(&self) -> Result<RuleBounds, &'static str> {
        match (self.inner, self.interval) {
            (true, (Some(lo), Some(hi))) => Ok(RuleBounds::Inner { lo, hi }),
            (true, _) => Err("inner rule requires both interval endpoints"),
            (false, (None, Some(hi))) => Ok(RuleBounds::UpTo { hi }),
            (false, (Some(lo), None)) => Ok(RuleBounds::After { lo }),
            (false, (Some(_), Some(_))) => {
                Err("rule with both endpoints must be marked inner")
            }
            (false, (None, None)) => Err("rule has no interval endpoint"),
        }
    }

    /// Affine transform of the rule
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        x * self.conv_k + self.conv_b
    }
}

/// Membership test of a well-formed rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleBounds {
    /// `lo < t <= hi`
    Inner { lo: f64, hi: f64 },
    /// `t <= hi`
    UpTo { hi: f64 },
    /// `t > lo`
    After { lo: f64 },
}

impl RuleBounds {
    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        match *self {
            Self::Inner { lo, hi } => lo < t && t <= hi,
            Self::UpTo { hi } => t <= hi,
            Self::After { lo } => t > lo,
        }
    }

    /// `(exclusive lower, inclusive upper)` with infinities for open ends
    pub fn span(&self) -> (f64, f64) {
        match *self {
            Self::Inner { lo, hi } => (lo, hi),
            Self::UpTo { hi } => (f64::NEG_INFINITY, hi),
            Self::After { lo } => (lo, f64::INFINITY),
        }
    }

    /// No timestamp can ever match
    pub fn is_empty(&self) -> bool {
        let (lo, hi) = self.span();
        lo >= hi
    }
}
