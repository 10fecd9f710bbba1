//! Consumer configuration

use crate::Rgb;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Consumer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    /// Input older than this is shown as stale (milliseconds)
    pub stale_after_ms: u64,

    /// Indicator color while the alarm runs
    pub alarm_color: Rgb,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            stale_after_ms: 3000,
            alarm_color: Rgb::RED,
        }
    }
}

impl ConsumerConfig {
    /// Stale threshold
    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }
}
