//! # Jitter policy for retry delays.
//!
//! [`JitterPolicy`] randomizes exponential backoff delays so that many callers
//! retrying the same dependency do not wake up in lockstep.
//!
//! - [`JitterPolicy::None`] - exact delay
//! - [`JitterPolicy::Full`] - uniform in `[0, d]`
//! - [`JitterPolicy::Equal`] - `d/2 + uniform[0, d/2]`
//! - [`JitterPolicy::Decorrelated`] - uniform in `[floor, 3·d]`, capped

use std::time::Duration;

use rand::Rng;

/// Policy controlling randomization of retry delays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No randomization.
    #[default]
    None,
    /// Uniform in `[0, delay]`.
    Full,
    /// `delay/2 + uniform[0, delay/2]`; keeps ~75% of the delay on average.
    Equal,
    /// Uniform in `[floor, delay * 3]`, capped at `cap`.
    Decorrelated,
}

impl JitterPolicy {
    /// Applies the policy to `delay`.
    ///
    /// `floor` and `cap` only matter for [`JitterPolicy::Decorrelated`]; the result never
    /// exceeds `cap` for that variant and never exceeds `delay` for the others.
    /// Randomization works in nanoseconds, so sub-millisecond delays keep their scale.
    pub fn apply(&self, delay: Duration, floor: Duration, cap: Duration) -> Duration {
        let n = nanos(delay);
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => {
                if n == 0 {
                    return Duration::ZERO;
                }
                Duration::from_nanos(rand::rng().random_range(0..=n))
            }
            JitterPolicy::Equal => {
                let half = n / 2;
                if half == 0 {
                    return delay;
                }
                Duration::from_nanos(half + rand::rng().random_range(0..=half))
            }
            JitterPolicy::Decorrelated => {
                let lo = nanos(floor);
                let hi = n.saturating_mul(3).min(nanos(cap)).max(lo);
                if lo >= hi {
                    return floor;
                }
                Duration::from_nanos(rand::rng().random_range(lo..=hi))
            }
        }
    }
}

fn nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAP: Duration = Duration::from_secs(30);

    #[test]
    fn none_is_identity() {
        let d = Duration::from_millis(1234);
        assert_eq!(JitterPolicy::None.apply(d, Duration::ZERO, CAP), d);
    }

    #[test]
    fn full_stays_within_delay() {
        let d = Duration::from_millis(1000);
        for _ in 0..100 {
            assert!(JitterPolicy::Full.apply(d, Duration::ZERO, CAP) <= d);
        }
        assert_eq!(
            JitterPolicy::Full.apply(Duration::ZERO, Duration::ZERO, CAP),
            Duration::ZERO
        );
    }

    #[test]
    fn equal_keeps_at_least_half() {
        let d = Duration::from_millis(1000);
        for _ in 0..100 {
            let j = JitterPolicy::Equal.apply(d, Duration::ZERO, CAP);
            assert!(j >= Duration::from_millis(500), "{j:?} below half");
            assert!(j <= d, "{j:?} above delay");
        }
    }

    #[test]
    fn sub_millisecond_delays_keep_their_scale() {
        let d = Duration::from_micros(800);
        let mut saw_nonzero = false;
        for _ in 0..100 {
            let full = JitterPolicy::Full.apply(d, Duration::ZERO, CAP);
            assert!(full <= d);
            saw_nonzero |= !full.is_zero();

            let equal = JitterPolicy::Equal.apply(d, Duration::ZERO, CAP);
            assert!(equal >= Duration::from_micros(400) && equal <= d, "{equal:?}");
        }
        assert!(saw_nonzero);
    }

    #[test]
    fn decorrelated_respects_floor_and_cap() {
        let floor = Duration::from_millis(100);
        let cap = Duration::from_secs(2);
        for _ in 0..100 {
            let j = JitterPolicy::Decorrelated.apply(Duration::from_secs(1), floor, cap);
            assert!(j >= floor);
            assert!(j <= cap);
        }
    }

    #[test]
    fn decorrelated_collapses_to_floor_when_range_is_empty() {
        let floor = Duration::from_millis(500);
        let j = JitterPolicy::Decorrelated.apply(Duration::from_millis(100), floor, floor);
        assert_eq!(j, floor);
    }
}
