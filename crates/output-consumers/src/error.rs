//! Output Error Types

use thiserror::Error;

/// Errors reported by output device drivers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputError {
    /// Device did not accept the update
    #[error("Output device unavailable: {0}")]
    DeviceUnavailable(String),
}
