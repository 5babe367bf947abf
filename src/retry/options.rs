//! # Retry configuration.
//!
//! Provides [`RetryOptions`], the settings consumed by [`retry`](crate::retry) and
//! [`retry_fn`](crate::retry_fn).
//!
//! ## Field semantics
//! - `strategy`: delay + continue decision (always present)
//! - `max_attempts`: cap on total invocations (`0` is rejected at call time)
//! - `on_retry`: side-effect hook before each retry
//! - `retry_if`: eligibility predicate consulted before the strategy

use std::{fmt, sync::Arc};

use crate::error::TaskError;
use crate::policies::{ExponentialBackoff, Strategy};

/// Hook invoked before each retry with `(attempt, error)`.
pub type OnRetryFn = Arc<dyn Fn(u32, &TaskError) + Send + Sync>;

/// Predicate deciding whether an error may be retried at all.
pub type RetryIfFn = Arc<dyn Fn(&TaskError) -> bool + Send + Sync>;

/// Settings for the retry engine.
///
/// All fields are public; the `with_*` methods are shortcuts for the common cases.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use taskawait::{ConstantDelay, RetryOptions};
///
/// let opts = RetryOptions::default()
///     .with_strategy(ConstantDelay::new(Duration::from_millis(50)))
///     .with_max_attempts(5)
///     .with_on_retry(|attempt, err| eprintln!("attempt {attempt} failed: {err}"));
///
/// assert_eq!(opts.max_attempts, 5);
/// ```
#[derive(Clone)]
pub struct RetryOptions {
    /// Delay calculation and continue/stop decision.
    pub strategy: Arc<dyn Strategy>,

    /// Maximum number of invocations, first attempt included.
    pub max_attempts: u32,

    /// Called before each retry (not after the final attempt).
    pub on_retry: Option<OnRetryFn>,

    /// When set and returning `false`, the error is surfaced immediately.
    pub retry_if: Option<RetryIfFn>,
}

impl RetryOptions {
    /// Creates options with the given strategy and attempt cap.
    pub fn new(strategy: impl Strategy + 'static, max_attempts: u32) -> Self {
        Self {
            strategy: Arc::new(strategy),
            max_attempts,
            on_retry: None,
            retry_if: None,
        }
    }

    /// Returns options with an updated attempt cap.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Returns options with an updated strategy.
    pub fn with_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategy = Arc::new(strategy);
        self
    }

    /// Returns options with a retry hook.
    pub fn with_on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(u32, &TaskError) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(f));
        self
    }

    /// Returns options with an eligibility predicate.
    pub fn with_retry_if<F>(mut self, f: F) -> Self
    where
        F: Fn(&TaskError) -> bool + Send + Sync + 'static,
    {
        self.retry_if = Some(Arc::new(f));
        self
    }

    /// `true` unless a predicate is configured and rejects `err`.
    #[inline]
    pub(crate) fn is_eligible(&self, err: &TaskError) -> bool {
        self.retry_if.as_ref().map_or(true, |f| f(err))
    }
}

impl Default for RetryOptions {
    /// Default configuration:
    ///
    /// - `strategy = ExponentialBackoff::default()` (100ms × 2, capped at 30s)
    /// - `max_attempts = 3`
    /// - no hook, no predicate
    fn default() -> Self {
        Self::new(ExponentialBackoff::default(), 3)
    }
}

impl fmt::Debug for RetryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOptions")
            .field("max_attempts", &self.max_attempts)
            .field("on_retry", &self.on_retry.is_some())
            .field("retry_if", &self.retry_if.is_some())
            .finish_non_exhaustive()
    }
}
