//! # User-defined strategy.
//!
//! [`CustomStrategy`] closes over user functions for both decisions. A missing delay
//! function means no delay; a missing continue function means always continue.

use std::{fmt, sync::Arc, time::Duration};

use crate::error::TaskError;
use crate::policies::strategy::Strategy;

/// Delay calculation for [`CustomStrategy`].
pub type DelayFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// Continue/stop decision for [`CustomStrategy`].
pub type ContinueFn = Arc<dyn Fn(u32, &TaskError) -> bool + Send + Sync>;

/// Strategy delegating to user-supplied functions.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use taskawait::{CustomStrategy, Strategy, TaskError};
///
/// let s = CustomStrategy::new()
///     .with_delay(|attempt| Duration::from_millis(100) * attempt)
///     .with_should_retry(|attempt, _err| attempt < 3);
///
/// assert_eq!(s.next_delay(2), Duration::from_millis(200));
/// assert!(!s.should_retry(3, &TaskError::fail("x")));
/// ```
#[derive(Clone, Default)]
pub struct CustomStrategy {
    /// Delay function; `None` yields zero delay.
    pub delay: Option<DelayFn>,
    /// Continue function; `None` always continues.
    pub should_retry: Option<ContinueFn>,
}

impl CustomStrategy {
    /// Creates a strategy with neither function set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delay function.
    pub fn with_delay<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        self.delay = Some(Arc::new(f));
        self
    }

    /// Sets the continue function.
    pub fn with_should_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(u32, &TaskError) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Some(Arc::new(f));
        self
    }
}

impl Strategy for CustomStrategy {
    fn next_delay(&self, attempt: u32) -> Duration {
        self.delay.as_ref().map_or(Duration::ZERO, |f| f(attempt))
    }

    fn should_retry(&self, attempt: u32, err: &TaskError) -> bool {
        self.should_retry.as_ref().map_or(true, |f| f(attempt, err))
    }
}

impl fmt::Debug for CustomStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomStrategy")
            .field("delay", &self.delay.is_some())
            .field("should_retry", &self.should_retry.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn empty_custom_strategy_defaults() {
        let s = CustomStrategy::new();
        assert_eq!(s.next_delay(5), Duration::ZERO);
        assert!(s.should_retry(5, &TaskError::fail("x")));
    }

    #[test]
    fn custom_functions_are_consulted() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let s = CustomStrategy::new()
            .with_delay(|attempt| Duration::from_millis(100) * attempt)
            .with_should_retry(move |attempt, _| {
                seen.fetch_add(1, Ordering::SeqCst);
                attempt < 3
            });

        assert_eq!(s.next_delay(1), Duration::from_millis(100));
        assert_eq!(s.next_delay(3), Duration::from_millis(300));
        assert!(s.should_retry(1, &TaskError::fail("x")));
        assert!(s.should_retry(2, &TaskError::fail("x")));
        assert!(!s.should_retry(3, &TaskError::fail("x")));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
