//! Classification Thresholds

use serde::{Deserialize, Serialize};

/// Levels and intensities used by the rule table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Normal river level (meters)
    pub baseline_level_m: f64,
    /// River level that is dangerous on its own (meters)
    pub danger_level_m: f64,
    /// High river level (meters)
    pub high_level_m: f64,
    /// Heavy rain (percent)
    pub heavy_rain: f64,
    /// Rain worth attention even with a low river (percent)
    pub extreme_rain: f64,
    /// Rain that triggers the physical alarm (percent)
    pub alarm_rain: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            baseline_level_m: 5.0,
            danger_level_m: 9.0,
            high_level_m: 7.0,
            heavy_rain: 50.0,
            extreme_rain: 70.0,
            alarm_rain: 80.0,
        }
    }
}
