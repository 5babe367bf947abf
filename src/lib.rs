//! # taskawait
//!
//! **Taskawait** runs groups of async tasks concurrently under one cancellation
//! scope and retries single tasks with pluggable delay strategies.
//!
//! It is a small building block: it owns no runtime, no registry and no
//! background workers. Every call launches its tasks, waits for the policy it
//! implements to be satisfied, and returns.
//!
//! ## Architecture
//! ### Join combinators
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   TaskRef    │   │   TaskRef    │   │   TaskRef    │
//!     │  (index 0)   │   │  (index 1)   │   │  (index 2)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  combinator (all / try_all / any / race)                          │
//! │  - child CancellationToken of the caller's scope                  │
//! │  - one tokio task per TaskRef                                     │
//! │  - panic isolation at each task boundary                          │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!    (0, result)        (1, result)        (2, result)
//!        └──────────────────┼──────────────────┘
//!                           ▼
//!              completion policy decides:
//!              - all:     every slot, input order
//!              - try_all: first failure cancels the rest
//!              - any:     first success cancels the rest
//!              - race:    first outcome cancels the rest
//! ```
//!
//! ### Retry loop
//! ```text
//! retry(ctx, task, opts)
//!
//! loop {
//!   ├─► ctx cancelled? ─► Canceled
//!   ├─► task.spawn(ctx).await
//!   │       ├─ Ok  ──► return value
//!   │       └─ Err ──► retry_if / permanent / strategy decide
//!   │                  ├─ stop      ─► raw error
//!   │                  ├─ last try  ─► RetryError { last_error, attempts }
//!   │                  └─ continue  ─► on_retry, sleep(next_delay) (cancellable)
//! }
//! ```
//!
//! ## Features
//! | Area            | Description                                                   | Key types / traits                                    |
//! |-----------------|---------------------------------------------------------------|-------------------------------------------------------|
//! | **Tasks**       | Define tasks as closures or trait objects.                    | [`Task`], [`TaskFn`], [`TaskRef`]                     |
//! | **Joins**       | Wait for all, the first success, or the first outcome.        | [`all`], [`try_all`], [`any`], [`race`]               |
//! | **Retry**       | Sequential attempts with delay strategies and hooks.          | [`retry`], [`retry_fn`], [`RetryOptions`]             |
//! | **Strategies**  | Constant, exponential, linear, custom delays; jitter.         | [`Strategy`], [`ExponentialBackoff`], [`JitterPolicy`]|
//! | **Errors**      | Typed task failures, aggregates, exhaustion, permanence.      | [`TaskError`], [`AwaitError`], [`AggregateError`]     |
//!
//! ## Logging
//! The crate emits [`tracing`] events (`debug` for lifecycle, `warn` for panics and
//! exhausted retries). Install any subscriber to see them.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use taskawait::{all, retry, ExponentialBackoff, RetryOptions, TaskError, TaskFn, TaskRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = CancellationToken::new();
//!
//!     let fetch = |id: u32| -> TaskRef<u32> {
//!         TaskFn::arc(format!("fetch-{id}"), move |_ctx: CancellationToken| async move {
//!             tokio::time::sleep(Duration::from_millis(u64::from(id))).await;
//!             Ok::<_, TaskError>(id * 10)
//!         })
//!     };
//!
//!     let results = all(&ctx, vec![fetch(3), fetch(1), fetch(2)]).await?;
//!     let values: Vec<u32> = results.into_iter().collect::<Result<_, _>>()?;
//!     assert_eq!(values, vec![30, 10, 20]);
//!
//!     let opts = RetryOptions::default()
//!         .with_strategy(ExponentialBackoff::new(
//!             Duration::from_millis(1),
//!             2.0,
//!             Duration::from_millis(10),
//!         ))
//!         .with_max_attempts(4);
//!     let value = retry(&ctx, fetch(7).as_ref(), &opts).await?;
//!     assert_eq!(value, 70);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod policies;
mod retry;
mod tasks;

// ---- Public re-exports ----

pub use crate::core::{all, any, race, try_all};
pub use error::{
    permanent, AggregateError, AwaitError, BoxError, PermanentError, RetryError, TaskError,
    TaskResult,
};
pub use policies::{
    ConstantDelay, ContinueFn, CustomStrategy, DelayFn, ExponentialBackoff, JitterPolicy,
    LinearBackoff, NoDelay, Strategy,
};
pub use retry::{conditions, retry, retry_fn, OnRetryFn, RetryIfFn, RetryOptions};
pub use tasks::{BoxTaskFuture, Task, TaskFn, TaskRef};
