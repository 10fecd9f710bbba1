//! Point-to-Point Lossy Channel

use crate::{ChannelStats, FanOutError};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

/// Result of a non-blocking send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// Item was queued
    Sent,
    /// Queue was full; the item was discarded
    Dropped,
    /// Receiver is gone
    Closed,
}

/// Create a bounded channel whose sender drops on full instead of waiting
pub fn lossy_channel<T>(
    name: &'static str,
    capacity: usize,
) -> Result<(LossySender<T>, mpsc::Receiver<T>), FanOutError> {
    if capacity == 0 {
        return Err(FanOutError::ZeroCapacity(name));
    }

    let (tx, rx) = mpsc::channel(capacity);
    let sender = LossySender {
        tx,
        stats: ChannelStats::new(name),
    };
    Ok((sender, rx))
}

/// Sending half of a [`lossy_channel`]
pub struct LossySender<T> {
    tx: mpsc::Sender<T>,
    stats: ChannelStats,
}

impl<T> LossySender<T> {
    /// Try to queue an item without waiting
    pub fn offer(&self, item: T) -> Offer {
        match self.tx.try_send(item) {
            Ok(()) => {
                self.stats.record_sent();
                Offer::Sent
            }
            Err(TrySendError::Full(_)) => {
                self.stats.record_dropped();
                debug!("Channel '{}' full, item dropped", self.stats.name());
                Offer::Dropped
            }
            Err(TrySendError::Closed(_)) => Offer::Closed,
        }
    }

    /// Counters for this channel
    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }

    /// Whether the receiving half has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
