//! Monitor Error Types

use fan_out::FanOutError;
use sensor_acquisition::AcquisitionError;
use thiserror::Error;

/// Errors while loading or checking configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File or environment could not be read or parsed
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Sensor calibration is inconsistent
    #[error(transparent)]
    Calibration(#[from] AcquisitionError),
}

/// Errors while installing the log subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The configured level is not a valid filter directive
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    /// A global subscriber is already set
    #[error("Failed to install log subscriber")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors while starting the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Channel setup failed: {0}")]
    Channel(#[from] FanOutError),
}
