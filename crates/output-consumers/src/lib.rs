//! Output Consumers
//!
//! Turn [`RiskReport`](risk_engine::RiskReport)s into what the status
//! display and the alarm actuator should show. Device drivers plug in
//! through [`DisplaySink`] and [`AlarmSink`]; this crate never touches
//! hardware and never feeds anything back upstream.

mod alarm;
mod config;
mod display;
mod error;
mod labels;

pub use alarm::{
    AlarmConsumer, AlarmSink, AlarmState, IndicatorPattern, Rgb, TracingAlarm, MATRIX_SIZE,
};
pub use config::ConsumerConfig;
pub use display::{DisplayConsumer, DisplayFrame, DisplaySink, TracingDisplay};
pub use error::OutputError;
pub use labels::category_label;

/// Counters returned when a consumer stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerSummary {
    /// Fresh reports received
    pub received: u64,
    /// Times the device was actually updated
    pub applied: u64,
    /// Waits that ended without new input
    pub stale: u64,
    /// Device updates that failed
    pub failed: u64,
}
