//! # Retry engine.
//!
//! Invokes one task sequentially in the caller's task until it succeeds, the
//! options refuse another attempt, or the cancellation scope fires.
//!
//! ```text
//! retry(ctx, task, opts)
//!
//! max_attempts == 0 ─► InvalidMaxAttempts
//! loop (attempt = 1..=max) {
//!   ├─► ctx cancelled?          ─► Canceled
//!   ├─► task.spawn(ctx).await
//!   │     └─ Ok(v)              ─► return v
//!   ├─► retry_if rejects        ─► Task(err)
//!   ├─► permanent error         ─► Task(err)
//!   ├─► strategy refuses        ─► Task(err)
//!   ├─► attempt == max          ─► Retry { last_error, attempts: max }
//!   ├─► on_retry(attempt, err)
//!   └─► select! { sleep(next_delay(attempt)), ctx.cancelled() ─► Canceled }
//! }
//! ```
//!
//! ## Rules
//! - Attempts never overlap; the counter starts at 1 and only grows.
//! - `on_retry` fires only when another attempt will actually be scheduled.
//! - `ctx` is checked before each attempt and during the delay only; a failed
//!   attempt is always classified, even if `ctx` fired while it ran.
//! - The delay sleep is abandoned as soon as `ctx` is cancelled.

use std::future::Future;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{AwaitError, RetryError, TaskResult};
use crate::retry::options::RetryOptions;
use crate::tasks::Task;

/// Runs `task` with retries according to `opts`.
///
/// Each attempt receives a clone of `ctx`. Returns the first successful value, or:
/// - [`AwaitError::InvalidMaxAttempts`] when `opts.max_attempts` is zero;
/// - [`AwaitError::Canceled`] when `ctx` fires before an attempt or during the delay;
/// - [`AwaitError::Task`] with the raw error when the predicate, a permanent marker,
///   or the strategy stops the loop;
/// - [`AwaitError::Retry`] when every attempt failed.
///
/// # Example
/// ```rust
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use taskawait::{retry, NoDelay, RetryOptions, TaskError, TaskFn};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), taskawait::AwaitError> {
/// let calls = Arc::new(AtomicU32::new(0));
/// let counter = calls.clone();
/// let flaky = TaskFn::new("flaky", move |_ctx: CancellationToken| {
///     let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
///     async move {
///         if n < 3 {
///             Err(TaskError::fail("not yet"))
///         } else {
///             Ok(n)
///         }
///     }
/// });
///
/// let opts = RetryOptions::new(NoDelay, 5);
/// let value = retry(&CancellationToken::new(), &flaky, &opts).await?;
/// assert_eq!(value, 3);
/// # Ok(())
/// # }
/// ```
pub async fn retry<T, K>(
    ctx: &CancellationToken,
    task: &K,
    opts: &RetryOptions,
) -> Result<T, AwaitError>
where
    K: Task<T> + ?Sized,
{
    run_attempts(task.name(), ctx, |attempt_ctx| task.spawn(attempt_ctx), opts).await
}

/// Runs a closure with retries according to `opts`.
///
/// Same semantics as [`retry`]; the closure may borrow from the caller since
/// attempts never leave the current task.
pub async fn retry_fn<T, F, Fut>(
    ctx: &CancellationToken,
    f: F,
    opts: &RetryOptions,
) -> Result<T, AwaitError>
where
    F: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = TaskResult<T>>,
{
    run_attempts("retry_fn", ctx, f, opts).await
}

async fn run_attempts<T, F, Fut>(
    name: &str,
    ctx: &CancellationToken,
    mut invoke: F,
    opts: &RetryOptions,
) -> Result<T, AwaitError>
where
    F: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = TaskResult<T>>,
{
    if opts.max_attempts == 0 {
        return Err(AwaitError::InvalidMaxAttempts);
    }

    let mut attempt: u32 = 1;
    loop {
        if ctx.is_cancelled() {
            return Err(AwaitError::Canceled);
        }

        let err = match invoke(ctx.clone()).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(task = name, attempt, "retry: succeeded");
                }
                return Ok(value);
            }
            Err(e) => e,
        };
        debug!(task = name, attempt, error = %err, "retry: attempt failed");

        if !opts.is_eligible(&err) {
            debug!(task = name, attempt, "retry: error not eligible");
            return Err(AwaitError::Task(err));
        }
        if err.is_permanent() {
            debug!(task = name, attempt, "retry: permanent error");
            return Err(AwaitError::Task(err));
        }
        if !opts.strategy.should_retry(attempt, &err) {
            debug!(task = name, attempt, "retry: strategy stopped");
            return Err(AwaitError::Task(err));
        }
        if attempt >= opts.max_attempts {
            warn!(task = name, attempts = attempt, error = %err, "retry: attempts exhausted");
            return Err(RetryError {
                last_error: err,
                attempts: attempt,
            }
            .into());
        }

        if let Some(hook) = &opts.on_retry {
            hook(attempt, &err);
        }

        let delay = opts.strategy.next_delay(attempt);
        debug!(task = name, attempt, delay = ?delay, "retry: backoff scheduled");

        let sleep = time::sleep(delay);
        tokio::pin!(sleep);
        select! {
            biased;
            _ = ctx.cancelled() => { return Err(AwaitError::Canceled); }
            _ = &mut sleep => {}
        }
        attempt += 1;
    }
}
