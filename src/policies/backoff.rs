//! # Growing backoff strategies.
//!
//! - [`ExponentialBackoff`]: `initial`, then each delay is the previous one times
//!   `multiplier`, clamped to `max` at every step.
//! - [`LinearBackoff`]: `initial + (attempt - 1) × increment`, unbounded.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use taskawait::{ExponentialBackoff, JitterPolicy, Strategy};
//!
//! let backoff = ExponentialBackoff {
//!     initial: Duration::from_millis(100),
//!     multiplier: 2.0,
//!     max: Duration::from_secs(1),
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.next_delay(1), Duration::from_millis(100));
//! assert_eq!(backoff.next_delay(4), Duration::from_millis(800));
//! // 1600ms → capped at max
//! assert_eq!(backoff.next_delay(5), Duration::from_secs(1));
//! ```

use std::time::Duration;

use crate::error::TaskError;
use crate::policies::{jitter::JitterPolicy, strategy::Strategy};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Exponential backoff with a sticky cap.
///
/// Once a step reaches `max`, every later attempt returns exactly `max`.
/// Jitter is applied to the clamped base and never feeds back into later steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExponentialBackoff {
    /// Delay after the first failed attempt.
    pub initial: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub multiplier: f64,
    /// Maximum delay cap.
    pub max: Duration,
    /// Randomization applied on top of the computed delay.
    pub jitter: JitterPolicy,
}

impl Default for ExponentialBackoff {
    /// `initial = 100ms`, `multiplier = 2.0`, `max = 30s`, no jitter.
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(100),
            multiplier: 2.0,
            max: Duration::from_secs(30),
            jitter: JitterPolicy::None,
        }
    }
}

impl ExponentialBackoff {
    /// Creates an exponential backoff without jitter.
    pub fn new(initial: Duration, multiplier: f64, max: Duration) -> Self {
        Self {
            initial,
            multiplier,
            max,
            jitter: JitterPolicy::None,
        }
    }

    /// Returns a copy with the given jitter policy.
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay for `attempt` before jitter.
    ///
    /// Computed as `initial × multiplier^(attempt - 1)` in nanoseconds; any product
    /// that is non-finite, negative or at least `max` becomes exactly `max`.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        if self.initial >= self.max {
            return self.max;
        }
        let exp = (attempt - 1).min(i32::MAX as u32) as i32;
        let cap_nanos = self.max.as_nanos() as f64;
        let next = self.initial.as_nanos() as f64 * self.multiplier.powi(exp);

        if !next.is_finite() || next < 0.0 || next >= cap_nanos {
            return self.max;
        }
        let nanos = next as u128;
        Duration::new(
            (nanos / NANOS_PER_SEC) as u64,
            (nanos % NANOS_PER_SEC) as u32,
        )
    }
}

impl Strategy for ExponentialBackoff {
    fn next_delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        self.jitter.apply(base, self.initial.min(self.max), self.max)
    }

    fn should_retry(&self, _attempt: u32, err: &TaskError) -> bool {
        !err.is_permanent()
    }
}

/// Linearly increasing delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearBackoff {
    /// Delay after the first failed attempt.
    pub initial: Duration,
    /// Amount added per further attempt.
    pub increment: Duration,
}

impl LinearBackoff {
    /// Creates a linear backoff.
    pub fn new(initial: Duration, increment: Duration) -> Self {
        Self { initial, increment }
    }
}

impl Strategy for LinearBackoff {
    fn next_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        self.increment
            .checked_mul(attempt - 1)
            .and_then(|extra| self.initial.checked_add(extra))
            .unwrap_or(Duration::MAX)
    }

    fn should_retry(&self, _attempt: u32, err: &TaskError) -> bool {
        !err.is_permanent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::permanent;

    fn exp(initial_ms: u64, multiplier: f64, max_ms: u64) -> ExponentialBackoff {
        ExponentialBackoff::new(
            Duration::from_millis(initial_ms),
            multiplier,
            Duration::from_millis(max_ms),
        )
    }

    #[test]
    fn exponential_growth_is_clamped() {
        let policy = exp(100, 2.0, 1_000);
        let delays: Vec<_> = (1..=5).map(|a| policy.next_delay(a)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(800),
                Duration::from_secs(1),
            ]
        );
    }

    #[test]
    fn exponential_clamp_is_sticky() {
        let policy = exp(100, 3.0, 1_000);
        for attempt in 4..64 {
            assert_eq!(policy.next_delay(attempt), Duration::from_secs(1));
        }
    }

    #[test]
    fn exponential_attempt_zero_is_zero() {
        assert_eq!(exp(100, 2.0, 1_000).next_delay(0), Duration::ZERO);
    }

    #[test]
    fn exponential_first_exceeding_max_is_clamped() {
        let policy = exp(10_000, 2.0, 5_000);
        assert_eq!(policy.next_delay(1), Duration::from_secs(5));
    }

    #[test]
    fn exponential_huge_attempt_does_not_overflow() {
        let policy = ExponentialBackoff::new(Duration::from_millis(100), 2.0, Duration::MAX);
        let d = policy.next_delay(u32::MAX);
        assert!(d >= Duration::from_secs(60 * 60 * 24 * 365));

        let policy = exp(100, f64::MAX, 10_000);
        assert_eq!(policy.next_delay(3), Duration::from_secs(10));
    }

    #[test]
    fn exponential_tiny_growth_reaches_cap_for_huge_attempts() {
        let policy = exp(100, 1.000_000_1, 3_600_000);
        assert_eq!(policy.next_delay(u32::MAX), Duration::from_secs(3600));

        let d = policy.next_delay(1_000);
        assert!(d > Duration::from_millis(100) && d < Duration::from_millis(101));
    }

    #[test]
    fn exponential_constant_factor() {
        let policy = exp(500, 1.0, 30_000);
        for attempt in 1..10 {
            assert_eq!(policy.next_delay(attempt), Duration::from_millis(500));
        }
    }

    #[test]
    fn exponential_equal_jitter_bounds() {
        let policy = exp(100, 2.0, 30_000).with_jitter(JitterPolicy::Equal);
        for attempt in 1..12 {
            let base = policy.base_delay(attempt);
            let delay = policy.next_delay(attempt);
            assert!(delay <= base, "attempt {attempt}: {delay:?} > {base:?}");
            assert!(delay >= base / 2 - Duration::from_millis(1));
        }
    }

    #[test]
    fn linear_growth() {
        let policy = LinearBackoff::new(Duration::from_millis(100), Duration::from_millis(50));
        assert_eq!(policy.next_delay(0), Duration::ZERO);
        assert_eq!(policy.next_delay(1), Duration::from_millis(100));
        assert_eq!(policy.next_delay(2), Duration::from_millis(150));
        assert_eq!(policy.next_delay(3), Duration::from_millis(200));
    }

    #[test]
    fn linear_saturates() {
        let policy = LinearBackoff::new(Duration::from_secs(1), Duration::MAX);
        assert_eq!(policy.next_delay(3), Duration::MAX);
    }

    #[test]
    fn growing_strategies_refuse_only_permanent() {
        let plain = TaskError::fail("503");
        let fatal = permanent("401");
        let e = ExponentialBackoff::default();
        let l = LinearBackoff::new(Duration::ZERO, Duration::ZERO);

        assert!(e.should_retry(99, &plain));
        assert!(!e.should_retry(1, &fatal));
        assert!(l.should_retry(99, &plain));
        assert!(!l.should_retry(1, &fatal));
    }
}
