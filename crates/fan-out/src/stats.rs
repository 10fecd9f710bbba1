//! Delivery Statistics

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    sent: AtomicU64,
    dropped: AtomicU64,
}

/// Sent/dropped counters for one queue
///
/// Cheap to clone; every clone observes the same counters, so the pipeline
/// can keep a handle after the sender has moved into its task.
#[derive(Debug, Clone)]
pub struct ChannelStats {
    name: &'static str,
    counters: Arc<Counters>,
}

impl ChannelStats {
    /// Create zeroed counters for the named queue
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Queue name used in logs and metric labels
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn record_sent(&self) {
        self.counters.sent.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("flood_monitor_messages_sent_total", "channel" => self.name).increment(1);
    }

    pub(crate) fn record_dropped(&self) {
        self.counters.dropped.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("flood_monitor_messages_dropped_total", "channel" => self.name)
            .increment(1);
    }

    /// Read the current counter values
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            sent: self.counters.sent.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ChannelStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Items accepted by the queue
    pub sent: u64,
    /// Items discarded because the queue was full
    pub dropped: u64,
}

impl StatsSnapshot {
    /// Fraction of offered items that were dropped (0.0 to 1.0)
    pub fn drop_ratio(&self) -> f64 {
        let offered = self.sent + self.dropped;
        if offered == 0 {
            0.0
        } else {
            self.dropped as f64 / offered as f64
        }
    }
}
