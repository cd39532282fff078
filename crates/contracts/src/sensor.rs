//! Sensor clocks and timestamp formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

/// Sensor whose clock produced a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sensor {
    /// Event camera (reference clock of every rule table)
    Dvs,
    /// Spinning lidar
    Lidar,
    /// RealSense depth camera
    Rs,
}

impl Sensor {
    pub const ALL: [Sensor; 3] = [Sensor::Dvs, Sensor::Lidar, Sensor::Rs];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dvs => "dvs",
            Self::Lidar => "lidar",
            Self::Rs => "rs",
        }
    }

    /// Unit of the native tick
    pub fn native_unit(self) -> &'static str {
        match self {
            Self::Dvs => "us",
            Self::Lidar => "ns",
            Self::Rs => "ms",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sensor {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dvs" => Ok(Self::Dvs),
            "lidar" => Ok(Self::Lidar),
            "rs" | "realsense" => Ok(Self::Rs),
            other => Err(ContractError::invalid_argument(format!(
                "unknown sensor '{other}', expected one of dvs, lidar, rs"
            ))),
        }
    }
}

/// Timestamp representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// Raw sensor ticks with an arbitrary initial offset
    #[default]
    Native,
    /// Seconds since recording start
    Relative,
}

impl TimeFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Relative => "relative",
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFormat {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "relative" | "rel" => Ok(Self::Relative),
            other => Err(ContractError::invalid_argument(format!(
                "unknown time format '{other}', expected native or relative"
            ))),
        }
    }
}

/// One of the four cross-sensor rule tables of a calibration document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossSensor {
    RsToDvs,
    LidarToDvs,
    DvsToRs,
    DvsToLidar,
}

impl CrossSensor {
    pub const ALL: [CrossSensor; 4] = [
        CrossSensor::RsToDvs,
        CrossSensor::LidarToDvs,
        CrossSensor::DvsToRs,
        CrossSensor::DvsToLidar,
    ];

    /// Key of the table in the calibration document
    pub fn key(self) -> &'static str {
        match self {
            Self::RsToDvs => "rs_to_dvs",
            Self::LidarToDvs => "lidar_to_dvs",
            Self::DvsToRs => "dvs_to_rs",
            Self::DvsToLidar => "dvs_to_lidar",
        }
    }

    pub fn source(self) -> Sensor {
        match self {
            Self::RsToDvs => Sensor::Rs,
            Self::LidarToDvs => Sensor::Lidar,
            Self::DvsToRs | Self::DvsToLidar => Sensor::Dvs,
        }
    }

    pub fn target(self) -> Sensor {
        match self {
            Self::RsToDvs | Self::LidarToDvs => Sensor::Dvs,
            Self::DvsToRs => Sensor::Rs,
            Self::DvsToLidar => Sensor::Lidar,
        }
    }

    /// Table mapping `from` native ticks to `to` native ticks, if one exists.
    ///
    /// Only DVS-centred tables exist, lidar <-> rs has to go through DVS.
    pub fn between(from: Sensor, to: Sensor) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.source() == from && t.target() == to)
    }
}

impl fmt::Display for CrossSensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
