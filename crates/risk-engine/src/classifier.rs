//! Risk Classifier Task

use crate::{RiskAssessment, RiskReport, RiskThresholds, RuleTable};
use fan_out::FanOut;
use sensor_acquisition::SensorReading;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Classifier timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Longest wait for a reading before reporting a stall (ms)
    pub input_timeout_ms: u64,
    /// Pause after each classification (ms)
    pub cycle_delay_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            input_timeout_ms: 5000,
            cycle_delay_ms: 500,
        }
    }
}

/// Counters returned when the classifier stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierSummary {
    /// Readings classified
    pub classified: u64,
    /// Input waits that timed out
    pub stalls: u64,
    /// Report copies lost to full consumer queues
    pub dropped_copies: u64,
}

/// Applies the rule table to incoming readings
pub struct RiskClassifier {
    thresholds: RiskThresholds,
    rules: RuleTable,
    config: ClassifierConfig,
}

impl RiskClassifier {
    /// Create a classifier with the standard rule table
    pub fn new(thresholds: RiskThresholds, config: ClassifierConfig) -> Self {
        let rules = RuleTable::standard(&thresholds);
        Self::with_rules(thresholds, rules, config)
    }

    /// Create a classifier with a custom rule table
    pub fn with_rules(
        thresholds: RiskThresholds,
        rules: RuleTable,
        config: ClassifierConfig,
    ) -> Self {
        for shadowed in rules.shadowed_clauses() {
            warn!(
                "{:?} rule clause {:?} is unreachable: {:?} rule matches it first",
                shadowed.rule, shadowed.clause, shadowed.shadowed_by
            );
        }

        Self {
            thresholds,
            rules,
            config,
        }
    }

    /// Whether the physical alarm should run
    pub fn alert_active(&self, level: f64, rain: f64) -> bool {
        level >= self.thresholds.high_level_m || rain > self.thresholds.alarm_rain
    }

    /// Classify a `(river level, rain intensity)` pair
    pub fn assess(&self, level: f64, rain: f64) -> RiskAssessment {
        RiskAssessment {
            category: self.rules.evaluate(level, rain),
            alert_active: self.alert_active(level, rain),
        }
    }

    /// Classify a reading
    pub fn classify(&self, reading: &SensorReading) -> RiskAssessment {
        self.assess(reading.river_level, reading.rain_intensity)
    }

    /// Run until the reading channel closes
    ///
    /// Each reading produces one [`RiskReport`], published once and copied
    /// to every live subscriber of `reports`.
    pub async fn run(
        self,
        mut readings: mpsc::Receiver<SensorReading>,
        mut reports: FanOut<RiskReport>,
    ) -> ClassifierSummary {
        info!(
            "Starting risk classifier ({} consumers)",
            reports.subscriber_count()
        );

        let input_timeout = Duration::from_millis(self.config.input_timeout_ms);
        let cycle_delay = Duration::from_millis(self.config.cycle_delay_ms);
        let mut summary = ClassifierSummary::default();
        let mut previous: Option<RiskAssessment> = None;

        loop {
            let reading = match tokio::time::timeout(input_timeout, readings.recv()).await {
                Ok(Some(reading)) => reading,
                Ok(None) => {
                    info!("Reading channel closed");
                    break;
                }
                Err(_) => {
                    summary.stalls += 1;
                    metrics::counter!("flood_monitor_classifier_stalls_total").increment(1);
                    warn!(
                        "No reading for {} ms, acquisition may be stalled",
                        self.config.input_timeout_ms
                    );
                    continue;
                }
            };

            summary.classified += 1;
            let assessment = self.classify(&reading);

            if previous != Some(assessment) {
                info!(
                    "Risk now {:?} (alarm {}) at river {:.2} m, rain {:.1}%",
                    assessment.category,
                    if assessment.alert_active { "on" } else { "off" },
                    reading.river_level,
                    reading.rain_intensity
                );
                previous = Some(assessment);
            }

            let outcome = reports.publish(RiskReport {
                cycle: summary.classified,
                reading,
                assessment,
            });
            summary.dropped_copies += outcome.dropped as u64;

            if outcome.delivered == 0 && outcome.dropped == 0 {
                debug!("Report {} had no consumers", summary.classified);
            }

            tokio::time::sleep(cycle_delay).await;
        }

        info!(
            "Classifier stopped: {} classified, {} stalls, {} copies dropped",
            summary.classified, summary.stalls, summary.dropped_copies
        );
        summary
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new(RiskThresholds::default(), ClassifierConfig::default())
    }
}
