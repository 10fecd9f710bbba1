//! Status Display Consumer

use crate::{category_label, ConsumerConfig, ConsumerSummary, OutputError};
use fan_out::{Delivery, Subscription};
use risk_engine::RiskReport;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

const ALARM_MESSAGE: &str = "FLOOD ALERT";

/// What the status display should show
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayFrame {
    /// Category and measured values
    Normal {
        label: &'static str,
        river_level: f64,
        rain_intensity: f64,
    },
    /// Single high-visibility warning, no numeric detail
    Alarm { message: &'static str },
    /// No fresh input; shows how long it has been
    Stale {
        age_secs: u64,
        last_label: Option<&'static str>,
    },
}

impl DisplayFrame {
    /// Frame for a fresh report
    pub fn from_report(report: &RiskReport) -> Self {
        if report.assessment.alert_active {
            DisplayFrame::Alarm {
                message: ALARM_MESSAGE,
            }
        } else {
            DisplayFrame::Normal {
                label: category_label(report.assessment.category),
                river_level: report.reading.river_level,
                rain_intensity: report.reading.rain_intensity,
            }
        }
    }

    /// Frame for a timed-out wait
    pub fn stale(last: Option<&RiskReport>, age: Duration) -> Self {
        DisplayFrame::Stale {
            age_secs: age.as_secs(),
            last_label: last.map(|r| category_label(r.assessment.category)),
        }
    }
}

impl fmt::Display for DisplayFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayFrame::Normal {
                label,
                river_level,
                rain_intensity,
            } => {
                writeln!(f, "Risk: {}", label)?;
                writeln!(f, "River: {:.1} m", river_level)?;
                write!(f, "Rain: {:.1} %", rain_intensity)
            }
            DisplayFrame::Alarm { message } => write!(f, "!! {} !!", message),
            DisplayFrame::Stale {
                age_secs,
                last_label,
            } => {
                writeln!(f, "NO DATA {}s", age_secs)?;
                write!(f, "Last: {}", last_label.unwrap_or("---"))
            }
        }
    }
}

/// Port to the display driver
pub trait DisplaySink: Send {
    /// Draw a frame
    fn render(&mut self, frame: &DisplayFrame) -> Result<(), OutputError>;
}

/// Writes frames to the log instead of a panel
#[derive(Debug, Default)]
pub struct TracingDisplay;

impl DisplaySink for TracingDisplay {
    fn render(&mut self, frame: &DisplayFrame) -> Result<(), OutputError> {
        let text = frame.to_string().replace('\n', " | ");
        match frame {
            DisplayFrame::Alarm { .. } => warn!(target: "display", "{}", text),
            _ => info!(target: "display", "{}", text),
        }
        Ok(())
    }
}

/// Drives the status display from risk reports
pub struct DisplayConsumer<D> {
    sink: D,
    stale_after: Duration,
    shown: Option<DisplayFrame>,
}

impl<D: DisplaySink> DisplayConsumer<D> {
    /// Create a consumer drawing to `sink`
    pub fn new(sink: D, config: &ConsumerConfig) -> Self {
        Self {
            sink,
            stale_after: config.stale_after(),
            shown: None,
        }
    }

    /// Redraw only when the frame changes
    fn show(&mut self, frame: DisplayFrame, summary: &mut ConsumerSummary) {
        if self.shown.as_ref() == Some(&frame) {
            return;
        }

        match self.sink.render(&frame) {
            Ok(()) => {
                summary.applied += 1;
                self.shown = Some(frame);
            }
            Err(e) => {
                summary.failed += 1;
                warn!("Display update failed: {}", e);
                self.shown = None;
            }
        }
    }

    /// Run until the subscription closes
    pub async fn run(mut self, mut reports: Subscription<RiskReport>) -> ConsumerSummary {
        info!("Display consumer '{}' started", reports.consumer());
        let mut summary = ConsumerSummary::default();

        loop {
            match reports.recv_within(self.stale_after).await {
                Delivery::Fresh(report) => {
                    summary.received += 1;
                    self.show(DisplayFrame::from_report(&report), &mut summary);
                }
                Delivery::Stale { last, age } => {
                    summary.stale += 1;
                    debug!("Display input stale for {:?}", age);
                    self.show(DisplayFrame::stale(last.as_ref(), age), &mut summary);
                }
                Delivery::Closed => break,
            }
        }

        info!("Display consumer '{}' stopped", reports.consumer());
        summary
    }
}
