//! Task builders shared by the combinator tests.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::tasks::{TaskFn, TaskRef};

/// Succeeds with `value` after `ms` milliseconds.
pub(crate) fn ok_after<T>(value: T, ms: u64) -> TaskRef<T>
where
    T: Clone + Send + Sync + 'static,
{
    TaskFn::arc("ok", move |_ctx: CancellationToken| {
        let value = value.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok::<T, TaskError>(value)
        }
    })
}

/// Fails with `msg` after `ms` milliseconds.
pub(crate) fn fail_after<T>(msg: &'static str, ms: u64) -> TaskRef<T>
where
    T: Send + 'static,
{
    TaskFn::arc("fail", move |_ctx: CancellationToken| async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Err::<T, _>(TaskError::fail(msg))
    })
}

/// Blocks until its scope is cancelled, then reports through `seen`.
pub(crate) fn until_cancelled<T>(seen: oneshot::Sender<()>) -> TaskRef<T>
where
    T: Send + 'static,
{
    let seen = std::sync::Mutex::new(Some(seen));
    TaskFn::arc("waiter", move |ctx: CancellationToken| {
        let seen = seen.lock().ok().and_then(|mut s| s.take());
        async move {
            ctx.cancelled().await;
            if let Some(tx) = seen {
                let _ = tx.send(());
            }
            Err::<T, _>(TaskError::Canceled)
        }
    })
}
