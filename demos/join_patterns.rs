//! # Example: join_patterns
//!
//! Runs the same three tasks through every join combinator:
//!
//! ```text
//! tasks: a (ok, 30ms)   b (err, 10ms)   c (ok, 20ms)
//!
//! all     → [Ok(a), Err(b), Ok(c)]           (input order)
//! try_all → Err(b)                           (a and c cancelled)
//! any     → c                                (first success)
//! race    → Err(b)                           (first outcome)
//! ```
//!
//! A panicking task is reported as an error instead of tearing down the caller.
//!
//! ## Run
//! ```bash
//! RUST_LOG=taskawait=debug cargo run --example join_patterns
//! ```

use std::time::Duration;

use taskawait::{all, any, race, try_all, TaskError, TaskFn, TaskRef};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn sleeper(name: &'static str, ms: u64, fail: bool) -> TaskRef<&'static str> {
    TaskFn::arc(name, move |ctx: CancellationToken| async move {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(ms)) => {}
            _ = ctx.cancelled() => {
                println!("[{name}] cancelled");
                return Err(TaskError::Canceled);
            }
        }
        if fail {
            Err(TaskError::fail(format!("{name} failed")))
        } else {
            Ok(name)
        }
    })
}

fn tasks() -> Vec<TaskRef<&'static str>> {
    vec![
        sleeper("a", 30, false),
        sleeper("b", 10, true),
        sleeper("c", 20, false),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskawait=debug")),
        )
        .init();

    let ctx = CancellationToken::new();

    let settled = all(&ctx, tasks()).await?;
    for (idx, res) in settled.iter().enumerate() {
        println!("[all] slot {idx}: {res:?}");
    }

    match try_all(&ctx, tasks()).await {
        Ok(values) => println!("[try_all] {values:?}"),
        Err(e) => println!("[try_all] failed: {e}"),
    }

    let winner = any(&ctx, tasks()).await?;
    println!("[any] winner: {winner}");

    match race(&ctx, tasks()).await {
        Ok(v) => println!("[race] first: {v}"),
        Err(e) => println!("[race] first: error {e}"),
    }

    let unstable: TaskRef<&'static str> = TaskFn::arc("unstable", |_ctx: CancellationToken| async {
        if std::env::var_os("NEVER_SET_IN_DEMO").is_none() {
            panic!("unstable task blew up");
        }
        Ok::<_, TaskError>("unreachable")
    });
    let settled = all(&ctx, vec![unstable, sleeper("d", 5, false)]).await?;
    println!("[all] with panic: {settled:?}");

    println!("[main] done.");
    Ok(())
}
