//! Conversion plans between (sensor, format) endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ContractError, CrossSensor, Sensor, TimeFormat};

/// A timestamp domain: one sensor clock in one representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub sensor: Sensor,
    pub format: TimeFormat,
}

impl Endpoint {
    pub fn new(sensor: Sensor, format: TimeFormat) -> Self {
        Self { sensor, format }
    }

    pub fn native(sensor: Sensor) -> Self {
        Self::new(sensor, TimeFormat::Native)
    }

    pub fn relative(sensor: Sensor) -> Self {
        Self::new(sensor, TimeFormat::Relative)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sensor, self.format)
    }
}

/// Parses `sensor[:format]`, format defaulting to native.
impl FromStr for Endpoint {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sensor, format) = match s.split_once(':') {
            Some((sensor, format)) => (sensor.parse::<Sensor>()?, format.parse::<TimeFormat>()?),
            None => (s.parse::<Sensor>()?, TimeFormat::Native),
        };
        Ok(Self { sensor, format })
    }
}

/// One elementary step of a conversion plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStep {
    /// native -> relative affine of one sensor
    ToRelative(Sensor),
    /// relative -> native affine of one sensor
    ToNative(Sensor),
    /// native -> native through a rule table
    Table(CrossSensor),
}

/// Conversion from one endpoint to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Conversion {
    pub fn new(from: Endpoint, to: Endpoint) -> Self {
        Self { from, to }
    }

    /// Decompose the conversion into elementary steps.
    ///
    /// Rule tables only connect native clocks and are all DVS-centred, so a
    /// lidar <-> rs conversion takes two table hops through DVS.
    pub fn steps(&self) -> Vec<ConversionStep> {
        let mut steps = Vec::with_capacity(4);

        if self.from.sensor == self.to.sensor {
            match (self.from.format, self.to.format) {
                (TimeFormat::Native, TimeFormat::Relative) => {
                    steps.push(ConversionStep::ToRelative(self.from.sensor))
                }
                (TimeFormat::Relative, TimeFormat::Native) => {
                    steps.push(ConversionStep::ToNative(self.from.sensor))
                }
                _ => {}
            }
            return steps;
        }

        if self.from.format == TimeFormat::Relative {
            steps.push(ConversionStep::ToNative(self.from.sensor));
        }

        match CrossSensor::between(self.from.sensor, self.to.sensor) {
            Some(table) => steps.push(ConversionStep::Table(table)),
            None => {
                // Neither side is DVS: hop through it.
                for table in [
                    CrossSensor::between(self.from.sensor, Sensor::Dvs),
                    CrossSensor::between(Sensor::Dvs, self.to.sensor),
                ]
                .into_iter()
                .flatten()
                {
                    steps.push(ConversionStep::Table(table));
                }
            }
        }

        if self.to.format == TimeFormat::Relative {
            steps.push(ConversionStep::ToRelative(self.to.sensor));
        }
        steps
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
