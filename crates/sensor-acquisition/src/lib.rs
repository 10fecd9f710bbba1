//! Sensor Acquisition
//!
//! Samples the rain and river analog channels on a fixed cadence, converts
//! the raw counts into physical units and offers each [`SensorReading`] to
//! the reading channel without ever blocking.

mod acquisition;
mod calibration;
mod error;
mod reading;
mod source;

pub use acquisition::{Acquisition, AcquisitionConfig, AcquisitionSummary};
pub use calibration::SensorCalibration;
pub use error::AcquisitionError;
pub use reading::{AdcChannel, SensorReading, MAX_ADC};
pub use source::{AnalogSource, ReplaySource, SimulatedJoystick};
