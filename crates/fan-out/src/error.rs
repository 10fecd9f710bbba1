//! Distribution Error Types

use thiserror::Error;

/// Errors raised while wiring channels
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FanOutError {
    /// Bounded queues need room for at least one item
    #[error("Channel '{0}' must have a capacity of at least 1")]
    ZeroCapacity(&'static str),
}
