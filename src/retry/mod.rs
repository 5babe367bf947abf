//! Sequential retries of a single task.
//!
//! - [`engine`] runs the attempt loop ([`retry`], [`retry_fn`]).
//! - [`options`] holds [`RetryOptions`] and its callback types.
//! - [`conditions`] provides ready-made `retry_if` predicates.

pub mod conditions;
mod engine;
mod options;

pub use engine::{retry, retry_fn};
pub use options::{OnRetryFn, RetryIfFn, RetryOptions};
