//! Pipeline Wiring
//!
//! Builds every channel explicitly and hands each task the ends it owns.
//! There is no shared state between tasks beyond the messages themselves.

use crate::{MonitorConfig, PipelineError};
use fan_out::{lossy_channel, ChannelStats, FanOut, StatsSnapshot};
use output_consumers::{AlarmConsumer, AlarmSink, ConsumerSummary, DisplayConsumer, DisplaySink};
use risk_engine::{ClassifierSummary, RiskClassifier, RiskReport};
use sensor_acquisition::{Acquisition, AcquisitionSummary, AnalogSource};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Drop counters across the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineStats {
    /// Acquisition to classifier
    pub readings: StatsSnapshot,
    /// Classifier to each consumer
    pub consumers: Vec<(&'static str, StatsSnapshot)>,
}

impl PipelineStats {
    /// Total items lost anywhere in the pipeline
    pub fn total_dropped(&self) -> u64 {
        self.readings.dropped + self.consumers.iter().map(|(_, s)| s.dropped).sum::<u64>()
    }
}

/// What each task reported when it stopped (`None` if it was cancelled or panicked)
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub acquisition: Option<AcquisitionSummary>,
    pub classifier: Option<ClassifierSummary>,
    pub display: Option<ConsumerSummary>,
    pub alarm: Option<ConsumerSummary>,
    pub stats: PipelineStats,
}

/// The running set of tasks
pub struct Pipeline {
    acquisition: JoinHandle<AcquisitionSummary>,
    classifier: JoinHandle<ClassifierSummary>,
    display: JoinHandle<ConsumerSummary>,
    alarm: JoinHandle<ConsumerSummary>,
    reading_stats: ChannelStats,
    consumer_stats: Vec<ChannelStats>,
}

impl Pipeline {
    /// Wire and spawn acquisition, classifier, display and alarm tasks
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<S, D, A>(
        config: &MonitorConfig,
        source: S,
        display_sink: D,
        alarm_sink: A,
    ) -> Result<Self, PipelineError>
    where
        S: AnalogSource + 'static,
        D: DisplaySink + 'static,
        A: AlarmSink + 'static,
    {
        config.validate()?;

        let (reading_tx, reading_rx) =
            lossy_channel("readings", config.channels.reading_capacity)?;
        let mut reports =
            FanOut::<RiskReport>::new("risk-reports", config.channels.report_capacity)?;
        let display_sub = reports.subscribe("display");
        let alarm_sub = reports.subscribe("alarm");

        let reading_stats = reading_tx.stats().clone();
        let consumer_stats = vec![display_sub.stats().clone(), alarm_sub.stats().clone()];

        let acquisition = Acquisition::new(
            source,
            config.calibration.clone(),
            config.acquisition.clone(),
        );
        let classifier = RiskClassifier::new(config.thresholds.clone(), config.classifier.clone());
        let display = DisplayConsumer::new(display_sink, &config.consumers);
        let alarm = AlarmConsumer::new(alarm_sink, &config.consumers);

        info!(
            "Starting pipeline: {} ms cadence, {} consumers",
            config.acquisition.period_ms,
            reports.subscriber_count()
        );

        Ok(Self {
            display: tokio::spawn(display.run(display_sub)),
            alarm: tokio::spawn(alarm.run(alarm_sub)),
            classifier: tokio::spawn(classifier.run(reading_rx, reports)),
            acquisition: tokio::spawn(acquisition.run(reading_tx)),
            reading_stats,
            consumer_stats,
        })
    }

    /// Current drop counters
    pub fn stats(&self) -> PipelineStats {
        collect_stats(&self.reading_stats, &self.consumer_stats)
    }

    /// Stop acquisition and let the downstream tasks drain
    ///
    /// Cancelling acquisition closes the reading channel; the classifier
    /// then finishes and closes the consumers' queues in turn.
    pub async fn shutdown(self) -> PipelineReport {
        info!("Shutting down pipeline");
        self.acquisition.abort();
        self.join().await
    }

    /// Wait for every task to finish on its own
    pub async fn join(self) -> PipelineReport {
        let acquisition = settle("acquisition", self.acquisition).await;
        let classifier = settle("classifier", self.classifier).await;
        let display = settle("display", self.display).await;
        let alarm = settle("alarm", self.alarm).await;

        let stats = collect_stats(&self.reading_stats, &self.consumer_stats);

        info!("Pipeline stopped, {} items dropped", stats.total_dropped());

        PipelineReport {
            acquisition,
            classifier,
            display,
            alarm,
            stats,
        }
    }
}

fn collect_stats(readings: &ChannelStats, consumers: &[ChannelStats]) -> PipelineStats {
    PipelineStats {
        readings: readings.snapshot(),
        consumers: consumers.iter().map(|s| (s.name(), s.snapshot())).collect(),
    }
}

async fn settle<T>(task: &str, handle: JoinHandle<T>) -> Option<T> {
    match handle.await {
        Ok(summary) => Some(summary),
        Err(e) if e.is_cancelled() => None,
        Err(e) => {
            error!("Task {} failed: {}", task, e);
            None
        }
    }
}
