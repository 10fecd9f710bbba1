//! Flood Risk Monitor
//!
//! Wires acquisition, classification and the output consumers into one
//! running pipeline, and owns configuration and logging setup.

mod error;
mod pipeline;
mod settings;

pub use error::{ConfigError, LoggingError, PipelineError};
pub use pipeline::{Pipeline, PipelineReport, PipelineStats};
pub use settings::{
    ChannelConfig, LoggingConfig, MonitorConfig, CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH,
};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(LoggingError::Install)
}

fn level_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    Ok(EnvFilter::try_new(level)?)
}
