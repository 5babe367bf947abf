//! # Run a single task unit on behalf of a combinator.
//!
//! - **Check the scope** before invoking: a unit that starts after cancellation
//!   records [`TaskError::Canceled`] without calling the task.
//! - **Isolate panics**: the task's future runs under `catch_unwind`, so a panic
//!   becomes [`TaskError::Panicked`] instead of tearing down the join.
//! - **Report by index**: [`spawn_reporting`] deposits `(index, result)` into a
//!   channel sized to one slot per task, so a unit that lost the race never blocks.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinError};
use tokio_util::sync::CancellationToken;

use crate::error::{TaskError, TaskResult};
use crate::tasks::TaskRef;

/// Settled outcome of one unit, tagged with its input position.
pub(crate) type Report<T> = (usize, TaskResult<T>);

/// Executes one invocation of `task` against `ctx`.
pub(crate) async fn run_unit<T>(task: TaskRef<T>, ctx: CancellationToken) -> TaskResult<T>
where
    T: Send + 'static,
{
    if ctx.is_cancelled() {
        return Err(TaskError::Canceled);
    }

    let res = AssertUnwindSafe(async { task.spawn(ctx).await })
        .catch_unwind()
        .await;

    match res {
        Ok(r) => r,
        Err(payload) => {
            let info = panic_info(payload.as_ref());
            tracing::warn!(task = task.name(), info = %info, "task panicked");
            Err(TaskError::Panicked { info })
        }
    }
}

/// Spawns every task on its own tokio task; each reports `(index, result)` once.
///
/// The channel closes after the last unit has reported. Units are detached: dropping
/// the receiver discards their results but lets them run to completion.
pub(crate) fn spawn_reporting<T>(
    tasks: Vec<TaskRef<T>>,
    scope: &CancellationToken,
) -> mpsc::Receiver<Report<T>>
where
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel(tasks.len().max(1));

    for (idx, task) in tasks.into_iter().enumerate() {
        let tx = tx.clone();
        let ctx = scope.clone();
        tokio::spawn(async move {
            let res = run_unit(task, ctx).await;
            let _ = tx.send((idx, res)).await;
        });
    }
    rx
}

/// Converts a join outcome of a spawned unit into the unit's task result.
pub(crate) fn joined<T>(res: Result<TaskResult<T>, JoinError>) -> TaskResult<T> {
    match res {
        Ok(r) => r,
        Err(e) if e.is_panic() => Err(TaskError::Panicked {
            info: panic_info(e.into_panic().as_ref()),
        }),
        Err(_) => Err(TaskError::Canceled),
    }
}

fn panic_info(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskFn;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn cancelled_scope_skips_invocation() {
        let invoked = Arc::new(AtomicBool::new(false));
        let flag = invoked.clone();
        let task: TaskRef<u8> = TaskFn::arc("never", move |_ctx: CancellationToken| {
            flag.store(true, Ordering::SeqCst);
            async { Ok::<u8, TaskError>(1) }
        });
        let ctx = CancellationToken::new();
        ctx.cancel();
        assert!(matches!(run_unit(task, ctx).await, Err(TaskError::Canceled)));
        assert!(!invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn panics_are_reported_as_errors() {
        let task: TaskRef<u8> = TaskFn::arc("boom", |_ctx: CancellationToken| async {
            let explode = || -> u8 { panic!("kaboom") };
            Ok::<u8, TaskError>(explode())
        });
        match run_unit(task, CancellationToken::new()).await {
            Err(TaskError::Panicked { info }) => assert_eq!(info, "kaboom"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn reports_carry_input_index() {
        let tasks: Vec<TaskRef<usize>> = (0..4)
            .map(|i| -> TaskRef<usize> {
                TaskFn::arc("idx", move |_ctx: CancellationToken| async move {
                    Ok::<_, TaskError>(i * 10)
                })
            })
            .collect();

        let mut rx = spawn_reporting(tasks, &CancellationToken::new());
        let mut seen = Vec::new();
        while let Some((idx, res)) = rx.recv().await {
            assert_eq!(res.ok(), Some(idx * 10));
            seen.push(idx);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
