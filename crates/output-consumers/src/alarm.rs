//! Alarm Actuator Consumer
//!
//! Drives the 5x5 indicator matrix, the buzzer enable flag and the status
//! LED. All three mirror `alert_active`; the category plays no part here.

use crate::{ConsumerConfig, ConsumerSummary, OutputError};
use fan_out::{Delivery, Subscription};
use risk_engine::RiskReport;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Matrix side length
pub const MATRIX_SIZE: usize = 5;

/// Indicator color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
}

/// Lit cells of the 5x5 matrix, one bitmask per row (bit 4 = leftmost)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPattern {
    rows: [u8; MATRIX_SIZE],
}

impl IndicatorPattern {
    /// Nothing lit
    pub const BLANK: IndicatorPattern = IndicatorPattern { rows: [0; MATRIX_SIZE] };

    /// Exclamation mark: the center column, top to bottom
    pub const EXCLAMATION: IndicatorPattern = IndicatorPattern {
        rows: [0b00100; MATRIX_SIZE],
    };

    /// Whether the cell at `row`, `col` is lit
    pub fn is_lit(&self, row: usize, col: usize) -> bool {
        if row >= MATRIX_SIZE || col >= MATRIX_SIZE {
            return false;
        }
        self.rows[row] & (1 << (MATRIX_SIZE - 1 - col)) != 0
    }

    /// Number of lit cells
    pub fn lit_count(&self) -> u32 {
        self.rows.iter().map(|r| r.count_ones()).sum()
    }
}

impl fmt::Display for IndicatorPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..MATRIX_SIZE {
            if row > 0 {
                write!(f, "/")?;
            }
            for col in 0..MATRIX_SIZE {
                write!(f, "{}", if self.is_lit(row, col) { '#' } else { '.' })?;
            }
        }
        Ok(())
    }
}

/// Complete actuator output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmState {
    pub pattern: IndicatorPattern,
    pub color: Rgb,
    /// Buzzer enable
    pub sound: bool,
    /// Status LED
    pub status_led: bool,
}

impl AlarmState {
    /// Everything off
    pub const IDLE: AlarmState = AlarmState {
        pattern: IndicatorPattern::BLANK,
        color: Rgb::OFF,
        sound: false,
        status_led: false,
    };

    /// Exclamation mark lit in `color`, buzzer and LED on
    pub fn active(color: Rgb) -> Self {
        Self {
            pattern: IndicatorPattern::EXCLAMATION,
            color,
            sound: true,
            status_led: true,
        }
    }

    /// Actuator state for an alert flag
    pub fn for_alert(alert_active: bool, color: Rgb) -> Self {
        if alert_active {
            Self::active(color)
        } else {
            Self::IDLE
        }
    }

    /// Whether the alarm is running
    pub fn is_active(&self) -> bool {
        self.sound
    }
}

/// Port to the matrix, buzzer and LED drivers
pub trait AlarmSink: Send {
    /// Apply a full actuator state
    fn apply(&mut self, state: &AlarmState) -> Result<(), OutputError>;
}

/// Logs actuator changes instead of driving hardware
#[derive(Debug, Default)]
pub struct TracingAlarm;

impl AlarmSink for TracingAlarm {
    fn apply(&mut self, state: &AlarmState) -> Result<(), OutputError> {
        if state.is_active() {
            warn!(target: "alarm", "ALARM ON: matrix {} color {:?}", state.pattern, state.color);
        } else {
            info!(target: "alarm", "Alarm idle");
        }
        Ok(())
    }
}

/// Drives the alarm actuator from risk reports
pub struct AlarmConsumer<A> {
    sink: A,
    color: Rgb,
    stale_after: std::time::Duration,
    applied: Option<AlarmState>,
}

impl<A: AlarmSink> AlarmConsumer<A> {
    /// Create a consumer driving `sink`
    pub fn new(sink: A, config: &ConsumerConfig) -> Self {
        Self {
            sink,
            color: config.alarm_color,
            stale_after: config.stale_after(),
            applied: None,
        }
    }

    fn apply(&mut self, state: AlarmState, summary: &mut ConsumerSummary) {
        if self.applied == Some(state) {
            return;
        }

        match self.sink.apply(&state) {
            Ok(()) => {
                summary.applied += 1;
                self.applied = Some(state);
            }
            Err(e) => {
                summary.failed += 1;
                warn!("Alarm update failed: {}", e);
                self.applied = None;
            }
        }
    }

    /// Run until the subscription closes
    ///
    /// Stale input holds whatever the actuator last showed: a running alarm
    /// keeps running and an idle one stays idle.
    pub async fn run(mut self, mut reports: Subscription<RiskReport>) -> ConsumerSummary {
        info!("Alarm consumer '{}' started", reports.consumer());
        let mut summary = ConsumerSummary::default();

        // Known state before the first report
        self.apply(AlarmState::IDLE, &mut summary);

        loop {
            match reports.recv_within(self.stale_after).await {
                Delivery::Fresh(report) => {
                    summary.received += 1;
                    let state = AlarmState::for_alert(report.assessment.alert_active, self.color);
                    self.apply(state, &mut summary);
                }
                Delivery::Stale { age, .. } => {
                    summary.stale += 1;
                    debug!("Alarm input stale for {:?}, holding output", age);
                }
                Delivery::Closed => break,
            }
        }

        info!("Alarm consumer '{}' stopped", reports.consumer());
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fan_out::FanOut;
    use risk_engine::{RiskAssessment, RiskCategory};
    use sensor_acquisition::SensorReading;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct RecordingAlarm {
        states: Arc<Mutex<Vec<AlarmState>>>,
        fail_next: Arc<Mutex<bool>>,
    }

    impl AlarmSink for RecordingAlarm {
        fn apply(&mut self, state: &AlarmState) -> Result<(), OutputError> {
            let mut fail = self.fail_next.lock().unwrap();
            if *fail {
                *fail = false;
                return Err(OutputError::DeviceUnavailable("matrix".to_string()));
            }
            self.states.lock().unwrap().push(*state);
            Ok(())
        }
    }

    fn report(cycle: u64, alert_active: bool) -> RiskReport {
        RiskReport {
            cycle,
            reading: SensorReading {
                raw_rain: 0,
                raw_river: 2048,
                river_level: 5.0,
                rain_intensity: 0.0,
            },
            assessment: RiskAssessment {
                category: RiskCategory::Safe,
                alert_active,
            },
        }
    }

    #[test]
    fn test_exclamation_is_center_column() {
        let pattern = IndicatorPattern::EXCLAMATION;
        assert_eq!(pattern.lit_count(), 5);
        for row in 0..MATRIX_SIZE {
            assert!(pattern.is_lit(row, 2));
            assert!(!pattern.is_lit(row, 0));
            assert!(!pattern.is_lit(row, 4));
        }
        assert_eq!(pattern.to_string(), "..#../..#../..#../..#../..#..");
        assert!(!pattern.is_lit(5, 2));
    }

    #[test]
    fn test_states_mirror_alert_flag() {
        let on = AlarmState::for_alert(true, Rgb::RED);
        assert!(on.sound && on.status_led);
        assert_eq!(on.pattern, IndicatorPattern::EXCLAMATION);
        assert_eq!(on.color, Rgb::RED);

        let off = AlarmState::for_alert(false, Rgb::RED);
        assert_eq!(off, AlarmState::IDLE);
        assert_eq!(off.pattern.lit_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_applies_only_changes() {
        let sink = RecordingAlarm::default();
        let states = sink.states.clone();
        let mut hub = FanOut::new("reports", 5).unwrap();
        let sub = hub.subscribe("alarm");

        for (cycle, active) in [(1, false), (2, true), (3, true), (4, false)] {
            hub.publish(report(cycle, active));
        }
        drop(hub);

        let summary = AlarmConsumer::new(sink, &ConsumerConfig::default())
            .run(sub)
            .await;

        assert_eq!(summary.received, 4);
        let states = states.lock().unwrap();
        // idle at start, on, off
        assert_eq!(states.len(), 3);
        assert!(!states[0].is_active());
        assert!(states[1].is_active());
        assert!(!states[2].is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_input_holds_running_alarm() {
        let sink = RecordingAlarm::default();
        let states = sink.states.clone();
        let mut hub = FanOut::new("reports", 5).unwrap();
        let sub = hub.subscribe("alarm");
        hub.publish(report(1, true));

        let task = tokio::spawn(AlarmConsumer::new(sink, &ConsumerConfig::default()).run(sub));
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        drop(hub);

        let summary = task.await.unwrap();
        assert_eq!(summary.stale, 3);
        let states = states.lock().unwrap();
        assert!(states.last().unwrap().is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_update_is_retried() {
        let sink = RecordingAlarm::default();
        let states = sink.states.clone();
        *sink.fail_next.lock().unwrap() = true;

        let mut hub = FanOut::new("reports", 5).unwrap();
        let sub = hub.subscribe("alarm");
        hub.publish(report(1, false));
        drop(hub);

        let summary = AlarmConsumer::new(sink, &ConsumerConfig::default())
            .run(sub)
            .await;

        assert_eq!(summary.failed, 1);
        // Initial idle failed, the first report re-applies idle
        assert_eq!(states.lock().unwrap().as_slice(), &[AlarmState::IDLE]);
    }
}
