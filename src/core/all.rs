//! # Wait-for-all joins.
//!
//! - [`all`] settles every task and returns one [`TaskResult`] per task, in input
//!   order. It never originates cancellation and never fails once started.
//! - [`try_all`] is the fail-fast shape: the first failure cancels the siblings
//!   and the call returns at once with an [`AggregateError`](crate::AggregateError).
//!
//! ```text
//! all(ctx, [t0, t1, t2])
//!   ├─► spawn t0 ─┐
//!   ├─► spawn t1 ─┼─► await handles in input order ─► [r0, r1, r2]
//!   └─► spawn t2 ─┘
//! ```

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::runner::{joined, run_unit, spawn_reporting};
use crate::error::{AggregateError, AwaitError, TaskError, TaskResult};
use crate::tasks::TaskRef;

/// Runs every task concurrently and returns each outcome in input order.
///
/// Fails only when `tasks` is empty ([`AwaitError::NoTasks`]) or `ctx` is already
/// cancelled ([`AwaitError::Canceled`]). Per-task failures live in the returned slots.
/// If the caller cancels `ctx` mid-flight, tasks that already finished keep their
/// outcome and the rest observe the cancellation through their own token.
///
/// # Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use taskawait::{all, TaskError, TaskFn, TaskRef};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), taskawait::AwaitError> {
/// let ok: TaskRef<u32> = TaskFn::arc("ok", |_ctx: CancellationToken| async {
///     Ok::<_, TaskError>(1)
/// });
/// let bad: TaskRef<u32> = TaskFn::arc("bad", |_ctx: CancellationToken| async {
///     Err::<u32, _>(TaskError::fail("unreachable host"))
/// });
///
/// let results = all(&CancellationToken::new(), vec![ok, bad]).await?;
/// assert_eq!(results[0].as_ref().ok(), Some(&1));
/// assert!(results[1].is_err());
/// # Ok(())
/// # }
/// ```
pub async fn all<T, I>(ctx: &CancellationToken, tasks: I) -> Result<Vec<TaskResult<T>>, AwaitError>
where
    T: Send + 'static,
    I: IntoIterator<Item = TaskRef<T>>,
{
    let tasks: Vec<TaskRef<T>> = tasks.into_iter().collect();
    if tasks.is_empty() {
        return Err(AwaitError::NoTasks);
    }
    if ctx.is_cancelled() {
        return Err(AwaitError::Canceled);
    }
    debug!(tasks = tasks.len(), "all: launching");

    let handles: Vec<JoinHandle<TaskResult<T>>> = tasks
        .into_iter()
        .map(|task| tokio::spawn(run_unit(task, ctx.clone())))
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(joined(handle.await));
    }

    debug!(
        tasks = results.len(),
        failed = results.iter().filter(|r| r.is_err()).count(),
        "all: settled"
    );
    Ok(results)
}

/// Runs every task concurrently; returns all values, or fails on the first failure.
///
/// The first failure cancels the remaining tasks through a child scope and the call
/// returns at once; siblings still running are detached, like the losers of
/// [`any`](crate::any). The [`AggregateError`] holds the first failure plus any other
/// failure already reported at that moment, in input order. Cancellations caused by
/// `try_all` itself are left out, cancellations caused by the caller are kept.
/// Empty input fails with [`AwaitError::NoTasks`], a cancelled `ctx` with
/// [`AwaitError::Canceled`].
pub async fn try_all<T, I>(ctx: &CancellationToken, tasks: I) -> Result<Vec<T>, AwaitError>
where
    T: Send + 'static,
    I: IntoIterator<Item = TaskRef<T>>,
{
    let tasks: Vec<TaskRef<T>> = tasks.into_iter().collect();
    if tasks.is_empty() {
        return Err(AwaitError::NoTasks);
    }
    if ctx.is_cancelled() {
        return Err(AwaitError::Canceled);
    }
    let total = tasks.len();
    debug!(tasks = total, "try_all: launching");

    let scope = ctx.child_token();
    let _guard = scope.clone().drop_guard();
    let mut rx = spawn_reporting(tasks, &scope);

    let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
    while let Some((idx, res)) = rx.recv().await {
        let err = match res {
            Ok(value) => {
                slots[idx] = Some(value);
                continue;
            }
            Err(e) => e,
        };
        scope.cancel();

        let caller_cancelled = ctx.is_cancelled();
        let mut failures = vec![(idx, err)];
        while let Ok((idx, res)) = rx.try_recv() {
            match res {
                Ok(_) => {}
                Err(TaskError::Canceled) if !caller_cancelled => {}
                Err(e) => failures.push((idx, e)),
            }
        }
        failures.sort_by_key(|(idx, _)| *idx);

        debug!(
            tasks = total,
            failed = failures.len(),
            first = idx,
            "try_all: failed"
        );
        let errors = failures.into_iter().map(|(_, e)| e).collect();
        return Err(AggregateError::new(errors).into());
    }

    slots
        .into_iter()
        .collect::<Option<Vec<T>>>()
        .ok_or(AwaitError::Canceled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{fail_after, ok_after, until_cancelled};
    use crate::tasks::TaskFn;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test(start_paused = true)]
    async fn all_success_preserves_input_order() {
        let tasks = vec![ok_after(1, 30), ok_after(2, 10), ok_after(3, 20)];
        let results = all(&CancellationToken::new(), tasks).await.unwrap();

        let values: Vec<i32> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn all_keeps_one_slot_per_task_on_failure() {
        let tasks = vec![
            fail_after::<i32>("error 1", 5),
            fail_after("error 2", 1),
            ok_after(30, 3),
        ];
        let results = all(&CancellationToken::new(), tasks).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap_err().to_string(), "error 1");
        assert_eq!(results[1].as_ref().unwrap_err().to_string(), "error 2");
        assert_eq!(results[2].as_ref().ok(), Some(&30));
    }

    #[tokio::test]
    async fn all_rejects_empty_input() {
        let tasks: Vec<TaskRef<u8>> = Vec::new();
        let err = all(&CancellationToken::new(), tasks).await.unwrap_err();
        assert!(matches!(err, AwaitError::NoTasks));
    }

    #[tokio::test]
    async fn all_rejects_cancelled_scope() {
        let ctx = CancellationToken::new();
        ctx.cancel();
        let err = all(&ctx, vec![ok_after(1u8, 0)]).await.unwrap_err();
        assert!(matches!(err, AwaitError::Canceled));
    }

    #[tokio::test(start_paused = true)]
    async fn all_observes_caller_cancellation_mid_flight() {
        let ctx = CancellationToken::new();
        let (tx, rx) = oneshot::channel();
        let tasks = vec![ok_after(7, 0), until_cancelled(tx)];

        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let results = all(&ctx, tasks).await.unwrap();
        assert_eq!(results[0].as_ref().ok(), Some(&7));
        assert!(matches!(results[1], Err(TaskError::Canceled)));
        assert!(rx.await.is_ok());
    }

    #[tokio::test]
    async fn all_reports_panics_per_slot() {
        let boom: TaskRef<u8> = TaskFn::arc("boom", |_ctx: CancellationToken| async {
            let explode = || -> u8 { panic!("bad slot") };
            Ok::<u8, TaskError>(explode())
        });
        let results = all(&CancellationToken::new(), vec![boom, ok_after(2, 0)])
            .await
            .unwrap();
        assert!(matches!(&results[0], Err(TaskError::Panicked { info }) if info == "bad slot"));
        assert_eq!(results[1].as_ref().ok(), Some(&2));
    }

    #[tokio::test(start_paused = true)]
    async fn all_is_repeatable_for_deterministic_tasks() {
        let tasks = || vec![ok_after("a", 2), fail_after("nope", 1), ok_after("c", 0)];
        let render = |rs: Vec<TaskResult<&'static str>>| -> Vec<String> {
            rs.into_iter()
                .map(|r| r.map_or_else(|e| format!("err:{e}"), |v| v.to_string()))
                .collect()
        };

        let ctx = CancellationToken::new();
        let first = render(all(&ctx, tasks()).await.unwrap());
        let second = render(all(&ctx, tasks()).await.unwrap());
        assert_eq!(first, second);
        assert_eq!(first, vec!["a", "err:nope", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn try_all_returns_values_when_all_succeed() {
        let values = try_all(&CancellationToken::new(), vec![ok_after(1, 5), ok_after(2, 1)])
            .await
            .unwrap();
        assert_eq!(values, vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn try_all_fails_fast_and_cancels_siblings() {
        let (tx, rx) = oneshot::channel();
        let tasks = vec![until_cancelled::<u8>(tx), fail_after("db down", 10)];

        let agg = match try_all(&CancellationToken::new(), tasks).await {
            Err(AwaitError::Aggregate(agg)) => agg,
            other => panic!("expected aggregate, got {other:?}"),
        };
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.to_string(), "multiple errors occurred: [db down]");
        assert!(rx.await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn try_all_does_not_wait_for_siblings_ignoring_cancellation() {
        let stubborn: TaskRef<u8> = TaskFn::arc("stubborn", |_ctx: CancellationToken| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<u8, TaskError>(1)
        });
        let started = tokio::time::Instant::now();
        let err = try_all(&CancellationToken::new(), vec![stubborn, fail_after("bad", 0)])
            .await
            .unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(1));
        match err {
            AwaitError::Aggregate(agg) => {
                let messages: Vec<String> = agg.iter().map(ToString::to_string).collect();
                assert_eq!(messages, vec!["bad"]);
            }
            other => panic!("expected aggregate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn try_all_rejects_empty_input() {
        let tasks: Vec<TaskRef<u8>> = Vec::new();
        assert!(matches!(
            try_all(&CancellationToken::new(), tasks).await,
            Err(AwaitError::NoTasks)
        ));
    }
}
