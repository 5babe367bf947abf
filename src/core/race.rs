//! # First-completion join.
//!
//! Same launch discipline as [`any`](crate::any), but the first task to settle wins
//! whether it succeeded or failed. Its outcome is returned verbatim.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::runner::spawn_reporting;
use crate::error::AwaitError;
use crate::tasks::TaskRef;

/// Returns the outcome of the first task to settle.
///
/// A failure wins over a slower success and comes back as [`AwaitError::Task`].
/// The child scope is cancelled as soon as the first outcome arrives.
/// Empty input fails with [`AwaitError::NoTasks`].
pub async fn race<T, I>(ctx: &CancellationToken, tasks: I) -> Result<T, AwaitError>
where
    T: Send + 'static,
    I: IntoIterator<Item = TaskRef<T>>,
{
    let tasks: Vec<TaskRef<T>> = tasks.into_iter().collect();
    if tasks.is_empty() {
        return Err(AwaitError::NoTasks);
    }
    debug!(tasks = tasks.len(), "race: launching");

    let scope = ctx.child_token();
    let _guard = scope.clone().drop_guard();
    let mut rx = spawn_reporting(tasks, &scope);

    let first = rx.recv().await;
    scope.cancel();

    match first {
        Some((idx, res)) => {
            debug!(winner = idx, ok = res.is_ok(), "race: settled");
            res.map_err(AwaitError::Task)
        }
        None => Err(AwaitError::Canceled),
    }
}
