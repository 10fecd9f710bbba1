//! Multi-Subscriber Fan-Out

use crate::{ChannelStats, FanOutError, Subscription};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

/// Per-publish delivery counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Subscribers that queued the item
    pub delivered: usize,
    /// Subscribers whose queue was full
    pub dropped: usize,
}

struct Subscriber<T> {
    consumer: &'static str,
    tx: mpsc::Sender<T>,
    stats: ChannelStats,
}

/// One producer, many independent consumers
///
/// Every subscriber owns a bounded queue, so each one sees every published
/// item exactly once and in publish order. A slow subscriber only loses its
/// own copies; the others are unaffected. The replication count always
/// equals the number of live subscribers.
pub struct FanOut<T> {
    name: &'static str,
    capacity: usize,
    subscribers: Vec<Subscriber<T>>,
}

impl<T: Clone> FanOut<T> {
    /// Create a fan-out whose subscriber queues hold `capacity` items each
    pub fn new(name: &'static str, capacity: usize) -> Result<Self, FanOutError> {
        if capacity == 0 {
            return Err(FanOutError::ZeroCapacity(name));
        }

        Ok(Self {
            name,
            capacity,
            subscribers: Vec::new(),
        })
    }

    /// Register a consumer and hand back its queue
    pub fn subscribe(&mut self, consumer: &'static str) -> Subscription<T> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let stats = ChannelStats::new(consumer);

        self.subscribers.push(Subscriber {
            consumer,
            tx,
            stats: stats.clone(),
        });

        info!(
            "Consumer '{}' subscribed to {} ({} subscribers)",
            consumer,
            self.name,
            self.subscribers.len()
        );

        Subscription::new(consumer, rx, stats)
    }

    /// Deliver one copy of `item` to every live subscriber without waiting
    pub fn publish(&mut self, item: T) -> PublishOutcome {
        let mut outcome = PublishOutcome::default();
        let name = self.name;

        self.subscribers.retain(|sub| match sub.tx.try_send(item.clone()) {
            Ok(()) => {
                sub.stats.record_sent();
                outcome.delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                sub.stats.record_dropped();
                outcome.dropped += 1;
                debug!("{}: queue for '{}' full, copy dropped", name, sub.consumer);
                true
            }
            Err(TrySendError::Closed(_)) => {
                warn!("{}: consumer '{}' went away, unsubscribing", name, sub.consumer);
                false
            }
        });

        outcome
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
