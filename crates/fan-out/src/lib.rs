//! Message Distribution
//!
//! Bounded, non-blocking channels between pipeline tasks. Producers never
//! wait: a full queue drops the item and the drop is counted. [`FanOut`]
//! gives every registered consumer its own queue so one logical publish
//! reaches all of them.

mod error;
mod hub;
mod lossy;
mod stats;
mod subscription;

pub use error::FanOutError;
pub use hub::{FanOut, PublishOutcome};
pub use lossy::{lossy_channel, LossySender, Offer};
pub use stats::{ChannelStats, StatsSnapshot};
pub use subscription::{Delivery, Subscription};

/// Queue depth used between pipeline stages
pub const DEFAULT_CAPACITY: usize = 5;
