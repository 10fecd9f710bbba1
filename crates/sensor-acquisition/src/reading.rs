//! Sensor Reading Types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Full-scale value of the 12-bit converter
pub const MAX_ADC: u16 = 4095;

/// Analog input channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdcChannel {
    /// Rain proxy (joystick X)
    Rain = 0,
    /// River level proxy (joystick Y)
    River = 1,
}

impl AdcChannel {
    /// Converter input index
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AdcChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdcChannel::Rain => write!(f, "rain"),
            AdcChannel::River => write!(f, "river"),
        }
    }
}

/// One acquisition cycle's worth of data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Raw rain channel count
    pub raw_rain: u16,
    /// Raw river channel count
    pub raw_river: u16,
    /// River level (meters)
    pub river_level: f64,
    /// Rain intensity (percent of modeled maximum)
    pub rain_intensity: f64,
}
