//! Ready-made eligibility predicates for [`RetryOptions::with_retry_if`](crate::RetryOptions::with_retry_if).
//!
//! They match on error *types* through the source chain, never on messages.

use std::error::Error as StdError;

use crate::error::{chain_find, TaskError};
use crate::retry::options::RetryIfFn;

/// Retries only errors whose source chain contains an `E`.
///
/// # Example
/// ```rust
/// use std::io;
/// use taskawait::{conditions, RetryOptions, TaskError};
///
/// let opts = RetryOptions::default().with_retry_if(conditions::retry_if_source::<io::Error>());
///
/// let io_err = TaskError::fail(io::Error::new(io::ErrorKind::TimedOut, "slow"));
/// assert!(opts.retry_if.as_ref().map_or(false, |f| f(&io_err)));
/// assert!(!opts.retry_if.as_ref().map_or(false, |f| f(&TaskError::fail("parse"))));
/// ```
pub fn retry_if_source<E>() -> impl Fn(&TaskError) -> bool + Send + Sync + Clone + 'static
where
    E: StdError + 'static,
{
    |err: &TaskError| chain_find::<E>(err).is_some()
}

/// Retries only errors whose source chain contains an `E` accepted by `pred`.
pub fn retry_if_source_matches<E, P>(pred: P) -> impl Fn(&TaskError) -> bool + Send + Sync + 'static
where
    E: StdError + 'static,
    P: Fn(&E) -> bool + Send + Sync + 'static,
{
    move |err: &TaskError| chain_find::<E>(err).is_some_and(&pred)
}

/// Retries when any of `preds` accepts the error.
pub fn any_of(preds: Vec<RetryIfFn>) -> impl Fn(&TaskError) -> bool + Send + Sync + 'static {
    move |err: &TaskError| preds.iter().any(|p| p(err))
}
