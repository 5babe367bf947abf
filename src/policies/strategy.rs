//! # Retry strategy capability.
//!
//! A [`Strategy`] answers two questions for the retry engine:
//! - how long to wait before the next attempt ([`Strategy::next_delay`]);
//! - whether to keep going after a failure ([`Strategy::should_retry`]).
//!
//! Built-in strategies only refuse permanent errors. Attempt limits belong to
//! [`RetryOptions::max_attempts`](crate::RetryOptions::max_attempts) and content
//! filtering to [`RetryOptions::retry_if`](crate::RetryOptions::retry_if).

use std::time::Duration;

use crate::error::TaskError;

/// Delay calculation plus continue/stop decision.
///
/// `attempt` is 1-based: `1` is the attempt that just failed for the first time.
pub trait Strategy: Send + Sync {
    /// Delay before the attempt following `attempt`.
    fn next_delay(&self, attempt: u32) -> Duration;

    /// Whether to retry after `attempt` failed with `err`.
    fn should_retry(&self, attempt: u32, err: &TaskError) -> bool;
}

/// Same delay before every retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstantDelay {
    /// Fixed wait between attempts.
    pub delay: Duration,
}

impl ConstantDelay {
    /// Creates a constant-delay strategy.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Strategy for ConstantDelay {
    fn next_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        self.delay
    }

    fn should_retry(&self, _attempt: u32, err: &TaskError) -> bool {
        !err.is_permanent()
    }
}

/// Immediate retry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoDelay;

impl Strategy for NoDelay {
    fn next_delay(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }

    fn should_retry(&self, _attempt: u32, err: &TaskError) -> bool {
        !err.is_permanent()
    }
}
