//! Acquisition Error Types

use crate::AdcChannel;
use thiserror::Error;

/// Errors while sampling or converting sensor data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcquisitionError {
    /// Raw sample above the converter's full scale
    #[error("{channel} sample {value} exceeds full scale {max}")]
    OutOfRange {
        channel: AdcChannel,
        value: u16,
        max: u16,
    },

    /// The converter did not produce a sample
    #[error("{0} channel read failed")]
    ReadFailed(AdcChannel),

    /// A finite source has no more samples
    #[error("Sample source exhausted")]
    Exhausted,

    /// Calibration constants are inconsistent
    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),
}
