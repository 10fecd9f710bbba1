//! Consumer Side of a Fan-Out

use crate::ChannelStats;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Outcome of a bounded wait on a [`Subscription`]
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery<T> {
    /// A new item arrived in time
    Fresh(T),
    /// Nothing arrived in time; carries the last-known-good item, if any
    Stale {
        last: Option<T>,
        /// Time since `last` arrived (or since subscribing, if nothing has)
        age: Duration,
    },
    /// The publisher is gone and the queue is drained
    Closed,
}

/// One consumer's private queue on a [`FanOut`](crate::FanOut)
pub struct Subscription<T> {
    consumer: &'static str,
    rx: mpsc::Receiver<T>,
    stats: ChannelStats,
    subscribed_at: Instant,
    last: Option<(T, Instant)>,
}

impl<T: Clone> Subscription<T> {
    pub(crate) fn new(consumer: &'static str, rx: mpsc::Receiver<T>, stats: ChannelStats) -> Self {
        Self {
            consumer,
            rx,
            stats,
            subscribed_at: Instant::now(),
            last: None,
        }
    }

    /// Wait for the next item with no deadline
    pub async fn recv(&mut self) -> Option<T> {
        let item = self.rx.recv().await?;
        self.last = Some((item.clone(), Instant::now()));
        Some(item)
    }

    /// Wait for the next item for at most `timeout`
    pub async fn recv_within(&mut self, timeout: Duration) -> Delivery<T> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(item)) => {
                self.last = Some((item.clone(), Instant::now()));
                Delivery::Fresh(item)
            }
            Ok(None) => Delivery::Closed,
            Err(_) => match &self.last {
                Some((item, at)) => Delivery::Stale {
                    last: Some(item.clone()),
                    age: at.elapsed(),
                },
                None => Delivery::Stale {
                    last: None,
                    age: self.subscribed_at.elapsed(),
                },
            },
        }
    }

    /// Most recent item received, if any
    pub fn last_known(&self) -> Option<&T> {
        self.last.as_ref().map(|(item, _)| item)
    }

    /// Name the consumer registered with
    pub fn consumer(&self) -> &'static str {
        self.consumer
    }

    /// Counters for this consumer's queue
    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }
}
