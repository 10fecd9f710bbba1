//! Periodic Acquisition Task

use crate::{AcquisitionError, AdcChannel, AnalogSource, SensorCalibration, SensorReading};
use fan_out::{LossySender, Offer};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Configuration for the acquisition task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Sampling period in milliseconds (default: 1000)
    pub period_ms: u64,
    /// Cycles per simulated flood scenario (default: 60)
    pub simulation_period_cycles: u32,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            period_ms: 1000,
            simulation_period_cycles: 60,
        }
    }
}

impl AcquisitionConfig {
    /// Sample twice a second
    pub fn fast() -> Self {
        Self {
            period_ms: 500,
            ..Default::default()
        }
    }

    /// Sampling period
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

/// Counters returned when the task stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquisitionSummary {
    /// Cycles attempted
    pub cycles: u64,
    /// Readings queued
    pub published: u64,
    /// Readings dropped on a full channel
    pub dropped: u64,
    /// Cycles skipped because sampling failed
    pub failed: u64,
}

/// Samples both channels on a fixed cadence
pub struct Acquisition<S> {
    source: S,
    calibration: SensorCalibration,
    config: AcquisitionConfig,
}

impl<S: AnalogSource> Acquisition<S> {
    /// Create an acquisition task over `source`
    pub fn new(source: S, calibration: SensorCalibration, config: AcquisitionConfig) -> Self {
        Self {
            source,
            calibration,
            config,
        }
    }

    /// Sample rain then river and convert
    pub fn acquire(&mut self) -> Result<SensorReading, AcquisitionError> {
        let raw_rain = self.source.sample(AdcChannel::Rain)?;
        let raw_river = self.source.sample(AdcChannel::River)?;
        self.calibration.reading(raw_rain, raw_river)
    }

    /// Run until the reading channel closes or the source runs dry
    ///
    /// Never waits on the channel: a full channel loses the reading and the
    /// next tick proceeds on schedule.
    pub async fn run(mut self, readings: LossySender<SensorReading>) -> AcquisitionSummary {
        info!("Starting acquisition every {} ms", self.config.period_ms);

        let mut ticker = tokio::time::interval(self.config.period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut summary = AcquisitionSummary::default();

        loop {
            ticker.tick().await;
            summary.cycles += 1;

            let reading = match self.acquire() {
                Ok(reading) => reading,
                Err(AcquisitionError::Exhausted) => {
                    info!("Sample source exhausted after {} cycles", summary.cycles - 1);
                    break;
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!("Acquisition cycle {} skipped: {}", summary.cycles, e);
                    continue;
                }
            };

            debug!(
                "Reading: river {:.2} m (raw {}), rain {:.1}% (raw {})",
                reading.river_level, reading.raw_river, reading.rain_intensity, reading.raw_rain
            );

            match readings.offer(reading) {
                Offer::Sent => summary.published += 1,
                Offer::Dropped => summary.dropped += 1,
                Offer::Closed => {
                    info!("Reading channel closed");
                    break;
                }
            }
        }

        info!(
            "Acquisition stopped: {} published, {} dropped, {} failed",
            summary.published, summary.dropped, summary.failed
        );
        summary
    }
}
