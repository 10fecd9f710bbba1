//! End-to-end tests for the wired pipeline.
//!
//! Run with paused time so the acquisition cadence, classifier delay and
//! stale timeouts advance deterministically.

use monitor::{MonitorConfig, Pipeline};
use output_consumers::{AlarmSink, AlarmState, DisplayFrame, DisplaySink, OutputError};
use sensor_acquisition::{AcquisitionError, AdcChannel, AnalogSource, ReplaySource};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Recorder<T> {
    items: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

/// Converter that stops answering after a fixed number of samples
struct FailsAfter {
    remaining: u32,
}

impl AnalogSource for FailsAfter {
    fn sample(&mut self, channel: AdcChannel) -> Result<u16, AcquisitionError> {
        if self.remaining == 0 {
            return Err(AcquisitionError::ReadFailed(channel));
        }
        self.remaining -= 1;
        Ok(2048)
    }
}

impl<T> Recorder<T> {
    fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.items.lock().unwrap())
    }
}

impl DisplaySink for Recorder<DisplayFrame> {
    fn render(&mut self, frame: &DisplayFrame) -> Result<(), OutputError> {
        self.items.lock().unwrap().push(frame.clone());
        Ok(())
    }
}

impl AlarmSink for Recorder<AlarmState> {
    fn apply(&mut self, state: &AlarmState) -> Result<(), OutputError> {
        self.items.lock().unwrap().push(*state);
        Ok(())
    }
}

/// Dry, rising, flood with heavy rain, storm over a low river
fn storm_scenario() -> ReplaySource {
    ReplaySource::new(vec![(0, 2000), (1638, 2457), (2457, 3276), (3500, 1000)])
}

// ============================================================================
// Full run
// ============================================================================

#[tokio::test(start_paused = true)]
async fn scenario_reaches_display_and_alarm() {
    let display = Recorder::<DisplayFrame>::default();
    let alarm = Recorder::<AlarmState>::default();

    let pipeline = Pipeline::start(
        &MonitorConfig::default(),
        storm_scenario(),
        display.clone(),
        alarm.clone(),
    )
    .unwrap();

    let report = pipeline.join().await;

    assert_eq!(report.acquisition.unwrap().published, 4);
    assert_eq!(report.classifier.unwrap().classified, 4);
    assert_eq!(report.display.unwrap().received, 4);
    assert_eq!(report.alarm.unwrap().received, 4);
    assert_eq!(report.stats.total_dropped(), 0);

    let frames = display.take();
    assert_eq!(frames.len(), 3);
    assert!(matches!(frames[0], DisplayFrame::Normal { label: "SAFE", .. }));
    match &frames[1] {
        DisplayFrame::Normal {
            label,
            river_level,
            rain_intensity,
        } => {
            assert_eq!(*label, "ATTENTION");
            assert!((river_level - 5.999).abs() < 0.01);
            assert!((rain_intensity - 40.0).abs() < 1e-9);
        }
        other => panic!("expected normal frame, got {:?}", other),
    }
    assert!(matches!(frames[2], DisplayFrame::Alarm { .. }));

    let states = alarm.take();
    assert_eq!(states.len(), 2);
    assert_eq!(states[0], AlarmState::IDLE);
    assert!(states[1].is_active());
}

#[tokio::test(start_paused = true)]
async fn every_consumer_sees_every_report() {
    let display = Recorder::<DisplayFrame>::default();
    let alarm = Recorder::<AlarmState>::default();
    let samples: Vec<(u16, u16)> = (0..20).map(|i| (i * 200, 1000 + i * 150)).collect();

    let pipeline = Pipeline::start(
        &MonitorConfig::default(),
        ReplaySource::new(samples),
        display,
        alarm,
    )
    .unwrap();

    let report = pipeline.join().await;
    let classified = report.classifier.unwrap().classified;

    assert_eq!(classified, 20);
    assert_eq!(report.display.unwrap().received, classified);
    assert_eq!(report.alarm.unwrap().received, classified);
    for (_, stats) in &report.stats.consumers {
        assert_eq!(stats.sent, classified);
        assert_eq!(stats.dropped, 0);
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn shutdown_drains_downstream_tasks() {
    let pipeline = Pipeline::start(
        &MonitorConfig::default(),
        ReplaySource::looping(vec![(0, 2048), (4095, 4095)]),
        Recorder::<DisplayFrame>::default(),
        Recorder::<AlarmState>::default(),
    )
    .unwrap();

    tokio::time::sleep(Duration::from_millis(5500)).await;
    let report = pipeline.shutdown().await;

    assert!(report.acquisition.is_none());
    let classified = report.classifier.unwrap().classified;
    assert!(classified >= 5);
    assert_eq!(report.display.unwrap().received, classified);
    assert_eq!(report.alarm.unwrap().received, classified);
}

#[tokio::test(start_paused = true)]
async fn dead_sensor_shows_stale_display() {
    let display = Recorder::<DisplayFrame>::default();

    // Two good cycles, then every read fails
    let pipeline = Pipeline::start(
        &MonitorConfig::default(),
        FailsAfter { remaining: 4 },
        display.clone(),
        Recorder::<AlarmState>::default(),
    )
    .unwrap();

    tokio::time::sleep(Duration::from_millis(7500)).await;
    let stats = pipeline.stats();
    assert_eq!(stats.readings.sent, 2);

    let report = pipeline.shutdown().await;
    assert!(report.classifier.unwrap().stalls >= 1);
    assert!(report.display.unwrap().stale >= 2);

    let frames = display.take();
    assert!(matches!(frames[0], DisplayFrame::Normal { label: "SAFE", .. }));
    assert_eq!(
        frames[1],
        DisplayFrame::Stale {
            age_secs: 3,
            last_label: Some("SAFE"),
        }
    );
    assert_eq!(
        frames[2],
        DisplayFrame::Stale {
            age_secs: 6,
            last_label: Some("SAFE"),
        }
    );
}

#[tokio::test]
async fn invalid_config_is_rejected() {
    let mut config = MonitorConfig::default();
    config.channels.report_capacity = 0;

    let result = Pipeline::start(
        &config,
        storm_scenario(),
        Recorder::<DisplayFrame>::default(),
        Recorder::<AlarmState>::default(),
    );
    assert!(result.is_err());
}
