//! # Example: retry_with_backoff
//!
//! Demonstrates how [`retry`] re-runs a failing task according to an
//! [`ExponentialBackoff`] strategy, and how a permanent error ends the loop early.
//!
//! ## Flow
//! ```text
//! retry(ctx, flaky, opts)
//!   ├─► attempt=1 → Err("boom #1")
//!   ├─► on_retry(1), sleep(≈100ms)
//!   ├─► attempt=2 → Err("boom #2")
//!   ├─► on_retry(2), sleep(≈200ms)
//!   └─► attempt=3 → Ok(3)
//!
//! retry(ctx, strict, opts)
//!   └─► attempt=1 → permanent("bad request") → returned as-is
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=taskawait=debug cargo run --example retry_with_backoff
//! ```

use std::{
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};

use taskawait::{
    permanent, retry, retry_fn, ExponentialBackoff, JitterPolicy, RetryOptions, TaskError, TaskFn,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

static ATTEMPTS: AtomicU32 = AtomicU32::new(0);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Logging (RUST_LOG, defaults to debug for this crate)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskawait=debug")),
        )
        .init();

    let ctx = CancellationToken::new();

    // 2. Define a task that fails 2 times before succeeding
    let flaky = TaskFn::new("flaky", |_ctx: CancellationToken| async move {
        let attempt = ATTEMPTS.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[flaky] attempt {attempt}");

        if attempt <= 2 {
            Err(TaskError::fail(format!("boom #{attempt}")))
        } else {
            Ok(attempt)
        }
    });

    // 3. Exponential backoff with equal jitter
    let backoff = ExponentialBackoff::new(Duration::from_millis(100), 2.0, Duration::from_secs(2))
        .with_jitter(JitterPolicy::Equal);
    let opts = RetryOptions::default()
        .with_strategy(backoff)
        .with_max_attempts(5)
        .with_on_retry(|attempt, err| println!("[main] attempt {attempt} failed: {err}"));

    let value = retry(&ctx, &flaky, &opts).await?;
    println!("[main] flaky succeeded with {value}");

    // 4. A permanent error is never retried
    let res = retry_fn(
        &ctx,
        |_ctx| async { Err::<(), _>(permanent("bad request")) },
        &opts,
    )
    .await;
    match res {
        Err(e) if e.is_permanent() => println!("[main] strict gave up at once: {e}"),
        other => println!("[main] unexpected: {other:?}"),
    }

    println!("[main] done.");
    Ok(())
}
