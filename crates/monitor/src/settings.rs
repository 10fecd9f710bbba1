//! Monitor Configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! TOML file, then `FLOOD_MONITOR__<SECTION>__<KEY>` environment variables.

use crate::ConfigError;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use output_consumers::ConsumerConfig;
use risk_engine::{ClassifierConfig, RiskThresholds};
use sensor_acquisition::{AcquisitionConfig, SensorCalibration};
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file
pub const CONFIG_PATH_VAR: &str = "FLOOD_MONITOR_CONFIG";

/// Config file used when [`CONFIG_PATH_VAR`] is unset
pub const DEFAULT_CONFIG_PATH: &str = "flood-monitor.toml";

/// Queue depths between tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Acquisition to classifier (default: 5)
    pub reading_capacity: usize,
    /// Classifier to each consumer (default: 5)
    pub report_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            reading_capacity: fan_out::DEFAULT_CAPACITY,
            report_capacity: fan_out::DEFAULT_CAPACITY,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG` (default: "info")
    pub level: String,
    /// Emit JSON lines instead of text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete monitor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub acquisition: AcquisitionConfig,
    pub calibration: SensorCalibration,
    pub thresholds: RiskThresholds,
    pub classifier: ClassifierConfig,
    pub channels: ChannelConfig,
    pub consumers: ConsumerConfig,
    pub logging: LoggingConfig,
}

impl MonitorConfig {
    /// Load from the file named by `FLOOD_MONITOR_CONFIG` plus the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from `path` (which may be missing) plus the environment
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Self::build(config::Config::builder().add_source(File::with_name(path).required(false)))
    }

    /// Parse TOML text plus the environment
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Self::build(config::Config::builder().add_source(File::from_str(text, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings = builder
            .add_source(
                Environment::with_prefix("FLOOD_MONITOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: MonitorConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.acquisition.period_ms == 0 {
            return Err(ConfigError::Invalid(
                "acquisition.period_ms must be positive".to_string(),
            ));
        }
        if self.classifier.input_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "classifier.input_timeout_ms must be positive".to_string(),
            ));
        }
        if self.consumers.stale_after_ms == 0 {
            return Err(ConfigError::Invalid(
                "consumers.stale_after_ms must be positive".to_string(),
            ));
        }
        if self.channels.reading_capacity == 0 || self.channels.report_capacity == 0 {
            return Err(ConfigError::Invalid(
                "channel capacities must be at least 1".to_string(),
            ));
        }

        let healthy_gap = self.acquisition.period_ms + self.classifier.cycle_delay_ms;
        if self.consumers.stale_after_ms <= healthy_gap {
            return Err(ConfigError::Invalid(format!(
                "consumers.stale_after_ms ({}) must exceed one healthy cycle ({} ms)",
                self.consumers.stale_after_ms, healthy_gap
            )));
        }

        let t = &self.thresholds;
        if t.baseline_level_m != self.calibration.baseline_level_m {
            return Err(ConfigError::Invalid(format!(
                "thresholds baseline {} m differs from calibration baseline {} m",
                t.baseline_level_m, self.calibration.baseline_level_m
            )));
        }
        if t.high_level_m > t.danger_level_m {
            return Err(ConfigError::Invalid(format!(
                "high level {} m exceeds danger level {} m",
                t.high_level_m, t.danger_level_m
            )));
        }

        self.calibration.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_engine::{RiskCategory, RiskClassifier};

    #[test]
    fn test_defaults_are_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.channels.reading_capacity, 5);
        assert_eq!(config.acquisition.period_ms, 1000);
        assert_eq!(config.thresholds.baseline_level_m, 5.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = MonitorConfig::from_toml(
            r#"
            [acquisition]
            period_ms = 500

            [thresholds]
            alarm_rain = 75.0

            [consumers.alarm_color]
            r = 128
            g = 0
            b = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.acquisition.period_ms, 500);
        assert_eq!(config.acquisition.simulation_period_cycles, 60);
        assert_eq!(config.thresholds.alarm_rain, 75.0);
        assert_eq!(config.thresholds.danger_level_m, 9.0);
        assert_eq!(config.consumers.alarm_color.r, 128);
        assert_eq!(config.classifier.cycle_delay_ms, 500);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = MonitorConfig::from_toml("[channels]\nreading_capacity = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_calibration_rejected() {
        let result = MonitorConfig::from_toml("[calibration]\ndead_zone_low = 2500\n");
        assert!(matches!(result, Err(ConfigError::Calibration(_))));
    }

    #[test]
    fn test_baseline_must_match_calibration() {
        let result = MonitorConfig::from_toml("[calibration]\nbaseline_level_m = 6.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let config = MonitorConfig::from_toml(
            "[calibration]\nbaseline_level_m = 6.0\n[thresholds]\nbaseline_level_m = 6.0\n",
        )
        .unwrap();

        // A river at rest sits exactly on the shared baseline
        let at_rest = config.calibration.reading(0, 2048).unwrap();
        let classifier = RiskClassifier::new(config.thresholds.clone(), config.classifier.clone());
        assert_eq!(at_rest.river_level, 6.0);
        assert_eq!(classifier.classify(&at_rest).category, RiskCategory::Safe);
    }

    #[test]
    fn test_stale_window_must_cover_one_cycle() {
        let mut config = MonitorConfig::default();
        config.consumers.stale_after_ms = 1500;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.consumers.stale_after_ms = 1501;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = MonitorConfig::load_from("does-not-exist.toml").unwrap();
        assert_eq!(config.classifier.input_timeout_ms, 5000);
    }
}
