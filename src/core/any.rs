//! # First-success join.
//!
//! ```text
//! any(ctx, [t0, t1, t2])
//!   ├─► child scope ◄── ctx
//!   ├─► spawn t0, t1, t2 ──► mpsc(len = 3)
//!   └─► recv loop:
//!         ├─ Ok(v)  ─► cancel child scope, return v
//!         └─ Err(e) ─► push e (completion order)
//!       all failed ─► AggregateError[e_first .. e_last]
//! ```

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::runner::spawn_reporting;
use crate::error::{AggregateError, AwaitError};
use crate::tasks::TaskRef;

/// Returns the value of the first task to succeed.
///
/// The winner cancels a child scope shared by the other tasks; losers that already
/// passed their own cancellation check run to completion and their results are
/// discarded. When every task fails, the error is an [`AggregateError`] whose order is
/// the order failures were observed. Empty input fails with [`AwaitError::NoTasks`].
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use taskawait::{any, TaskError, TaskFn, TaskRef};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), taskawait::AwaitError> {
/// let primary: TaskRef<&str> = TaskFn::arc("primary", |_ctx: CancellationToken| async {
///     Err::<&str, _>(TaskError::fail("primary down"))
/// });
/// let mirror: TaskRef<&str> = TaskFn::arc("mirror", |_ctx: CancellationToken| async {
///     tokio::time::sleep(Duration::from_millis(5)).await;
///     Ok::<_, TaskError>("mirror")
/// });
///
/// let winner = any(&CancellationToken::new(), vec![primary, mirror]).await?;
/// assert_eq!(winner, "mirror");
/// # Ok(())
/// # }
/// ```
pub async fn any<T, I>(ctx: &CancellationToken, tasks: I) -> Result<T, AwaitError>
where
    T: Send + 'static,
    I: IntoIterator<Item = TaskRef<T>>,
{
    let tasks: Vec<TaskRef<T>> = tasks.into_iter().collect();
    if tasks.is_empty() {
        return Err(AwaitError::NoTasks);
    }
    let total = tasks.len();
    debug!(tasks = total, "any: launching");

    let scope = ctx.child_token();
    let _guard = scope.clone().drop_guard();
    let mut rx = spawn_reporting(tasks, &scope);

    let mut errors = Vec::with_capacity(total);
    while let Some((idx, res)) = rx.recv().await {
        match res {
            Ok(value) => {
                scope.cancel();
                debug!(winner = idx, failed = errors.len(), "any: settled");
                return Ok(value);
            }
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        return Err(AwaitError::Canceled);
    }
    debug!(failed = errors.len(), "any: all tasks failed");
    Err(AggregateError::new(errors).into())
}
