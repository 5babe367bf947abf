//! # Task abstraction.
//!
//! This module defines the [`Task`] trait (async, cancelable, generic over its output).
//! The common handle type is [`TaskRef`], an `Arc<dyn Task<T>>` suitable for handing
//! to the combinators, which move it onto its own tokio task.
//!
//! A task receives a [`CancellationToken`] and should check it to stop cooperatively
//! once a join has been decided or the caller gives up.

use std::{future::Future, pin::Pin, sync::Arc};

use tokio_util::sync::CancellationToken;

use crate::error::TaskResult;

/// Boxed future returned by [`Task::spawn`].
pub type BoxTaskFuture<T> = Pin<Box<dyn Future<Output = TaskResult<T>> + Send + 'static>>;

/// # Shared handle to a task object.
pub type TaskRef<T> = Arc<dyn Task<T>>;

/// # Asynchronous, cancelable unit of work producing a `T`.
///
/// Every call to [`spawn`](Task::spawn) must create a **fresh** future: the retry engine
/// calls it once per attempt, the combinators exactly once.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use taskawait::{BoxTaskFuture, Task, TaskError};
///
/// struct Lookup;
///
/// impl Task<u32> for Lookup {
///     fn name(&self) -> &str { "lookup" }
///
///     fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture<u32> {
///         Box::pin(async move {
///             if ctx.is_cancelled() {
///                 return Err(TaskError::Canceled);
///             }
///             Ok(7)
///         })
///     }
/// }
/// ```
pub trait Task<T>: Send + Sync + 'static {
    /// Returns a stable, human-readable task name (used in logs).
    fn name(&self) -> &str;

    /// Creates a new future performing one invocation of the task.
    fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture<T>;
}
