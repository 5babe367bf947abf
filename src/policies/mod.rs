//! Retry strategies.
//!
//! This module groups the knobs that control **whether** the retry engine tries
//! again and **how long** it waits between attempts.
//!
//! ## Contents
//! - [`Strategy`] the capability: next delay + continue/stop decision
//! - [`ExponentialBackoff`] initial / multiplier / max (+ optional jitter)
//! - [`LinearBackoff`] initial + (n-1) × increment
//! - [`ConstantDelay`], [`NoDelay`] flat delays
//! - [`CustomStrategy`] user closures for both decisions
//! - [`JitterPolicy`] randomization applied by [`ExponentialBackoff`]
//!
//! ## Defaults
//! - `ExponentialBackoff::default()` → initial=100ms, multiplier=2.0, max=30s, jitter=None.

mod backoff;
mod custom;
mod jitter;
mod strategy;

pub use backoff::{ExponentialBackoff, LinearBackoff};
pub use custom::{ContinueFn, CustomStrategy, DelayFn};
pub use jitter::JitterPolicy;
pub use strategy::{ConstantDelay, NoDelay, Strategy};
