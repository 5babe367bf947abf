//! Error types used by the join combinators, the retry engine and tasks.
//!
//! - [`TaskError`] - the failure of one task invocation.
//! - [`PermanentError`] - marker wrapping an error the retry engine must not retry.
//! - [`AggregateError`] - every failure of a join that produced no winner.
//! - [`RetryError`] - exhaustion of the attempt budget.
//! - [`AwaitError`] - the error returned by every public entry point.
//!
//! All of them expose their cause through [`std::error::Error::source`], so callers
//! can match by type (`downcast_ref`) instead of by message.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed, thread-safe error used as the payload of task failures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Outcome of a single task invocation.
pub type TaskResult<T> = Result<T, TaskError>;

/// # Errors produced by task execution.
///
/// Tasks return these; combinators either carry them per slot, aggregate them,
/// or hand them back verbatim.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task execution failed; the retry engine may try again.
    #[error("{0}")]
    Fail(#[source] BoxError),

    /// Task execution failed and must not be retried.
    ///
    /// The marker stays in the source chain, so `find::<PermanentError>()` sees it.
    #[error("{0}")]
    Permanent(#[from] PermanentError),

    /// The cancellation scope fired before or while the task ran.
    #[error("context cancelled")]
    Canceled,

    /// The task's future panicked; the panic was caught at the task boundary.
    #[error("task panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl TaskError {
    /// Wraps any error as a retryable failure.
    ///
    /// # Example
    /// ```
    /// use taskawait::TaskError;
    ///
    /// let err = TaskError::fail("connection refused");
    /// assert_eq!(err.to_string(), "connection refused");
    /// assert!(err.is_retryable());
    /// ```
    pub fn fail(err: impl Into<BoxError>) -> Self {
        TaskError::Fail(err.into())
    }

    /// Wraps any error as a permanent (non-retryable) failure.
    pub fn permanent(err: impl Into<BoxError>) -> Self {
        TaskError::Permanent(PermanentError::new(err))
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail(_) => "task_failed",
            TaskError::Permanent(_) => "task_permanent",
            TaskError::Canceled => "task_canceled",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }

    /// Returns `true` if this error, or any error in its source chain, is a [`PermanentError`].
    ///
    /// A permanent marker buried inside a caller's own error type is still found.
    pub fn is_permanent(&self) -> bool {
        if matches!(self, TaskError::Permanent(_)) {
            return true;
        }
        chain_contains::<PermanentError>(self)
    }

    /// Returns `true` for [`TaskError::Canceled`].
    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }

    /// Indicates whether the error kind is safe to retry.
    ///
    /// `false` for permanent errors, cancellations and panics.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TaskError::Fail(_)) && !self.is_permanent()
    }
}

/// Marks an error as terminal for the retry engine.
///
/// Displays as the wrapped error; [`source`](StdError::source) yields it.
#[derive(Debug)]
pub struct PermanentError {
    source: BoxError,
}

impl PermanentError {
    /// Wraps `err`.
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self { source: err.into() }
    }

    /// Returns the wrapped error.
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }

    /// Unwraps the marker.
    pub fn into_inner(self) -> BoxError {
        self.source
    }
}

impl fmt::Display for PermanentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl StdError for PermanentError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Marks `err` as non-retryable.
///
/// # Example
/// ```
/// use taskawait::permanent;
///
/// let err = permanent("invalid credentials");
/// assert!(err.is_permanent());
/// assert_eq!(err.to_string(), "invalid credentials");
/// ```
pub fn permanent(err: impl Into<BoxError>) -> TaskError {
    TaskError::permanent(err)
}

/// # Every failure of a join that produced no winner.
///
/// Never empty when returned by a combinator. The order is documented by the
/// combinator that produced it.
#[derive(Debug)]
pub struct AggregateError {
    errors: Vec<TaskError>,
}

impl AggregateError {
    pub(crate) fn new(errors: Vec<TaskError>) -> Self {
        debug_assert!(!errors.is_empty(), "aggregate error must not be empty");
        Self { errors }
    }

    /// Number of collected errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false` for aggregates returned by this crate.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates the collected errors in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TaskError> {
        self.errors.iter()
    }

    /// Consumes the aggregate, returning its errors.
    pub fn into_errors(self) -> Vec<TaskError> {
        self.errors
    }

    /// Returns the first error of type `E` found in any member or its source chain.
    ///
    /// # Example
    /// ```
    /// use std::io;
    /// use taskawait::AggregateError;
    ///
    /// # fn check(agg: &AggregateError) {
    /// if let Some(io_err) = agg.find::<io::Error>() {
    ///     println!("io failure: {io_err}");
    /// }
    /// # }
    /// ```
    pub fn find<E: StdError + 'static>(&self) -> Option<&E> {
        self.errors.iter().find_map(|e| chain_find::<E>(e))
    }

    /// Returns `true` if any member, or its source chain, holds an error of type `E`.
    pub fn contains<E: StdError + 'static>(&self) -> bool {
        self.find::<E>().is_some()
    }

    /// Returns `true` if any member is permanent (see [`TaskError::is_permanent`]).
    pub fn any_permanent(&self) -> bool {
        self.errors.iter().any(TaskError::is_permanent)
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("no errors");
        }
        f.write_str("multiple errors occurred: [")?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        f.write_str("]")
    }
}

impl StdError for AggregateError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.errors.first().map(|e| e as &(dyn StdError + 'static))
    }
}

impl<'a> IntoIterator for &'a AggregateError {
    type Item = &'a TaskError;
    type IntoIter = std::slice::Iter<'a, TaskError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// # Exhaustion of the retry budget.
///
/// `attempts` equals the configured maximum; `source()` is the last failure.
#[derive(Error, Debug)]
#[error("retry failed after {attempts} attempts: {last_error}")]
pub struct RetryError {
    /// Failure of the final attempt.
    #[source]
    pub last_error: TaskError,
    /// Total number of invocations made.
    pub attempts: u32,
}

impl RetryError {
    /// Unwraps the last underlying error.
    pub fn into_last_error(self) -> TaskError {
        self.last_error
    }
}

/// # Errors returned by the combinators and the retry engine.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AwaitError {
    /// Empty task sequence handed to a combinator.
    #[error("no tasks provided")]
    NoTasks,

    /// `max_attempts` was zero.
    #[error("max attempts must be greater than 0")]
    InvalidMaxAttempts,

    /// The caller's cancellation scope fired.
    #[error("context cancelled")]
    Canceled,

    /// A single task's failure, returned verbatim.
    #[error(transparent)]
    Task(#[from] TaskError),

    /// Every task of a join failed.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// The retry budget was exhausted.
    #[error(transparent)]
    Retry(#[from] RetryError),
}

impl AwaitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskawait::AwaitError;
    ///
    /// assert_eq!(AwaitError::NoTasks.as_label(), "no_tasks");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            AwaitError::NoTasks => "no_tasks",
            AwaitError::InvalidMaxAttempts => "invalid_max_attempts",
            AwaitError::Canceled => "canceled",
            AwaitError::Task(e) => e.as_label(),
            AwaitError::Aggregate(_) => "aggregate",
            AwaitError::Retry(_) => "retry_exhausted",
        }
    }

    /// `true` when the caller asked to stop, either observed by the engine
    /// or reported by the task itself.
    pub fn is_canceled(&self) -> bool {
        match self {
            AwaitError::Canceled => true,
            AwaitError::Task(e) => e.is_canceled(),
            _ => false,
        }
    }

    /// `true` when a permanent error is the terminal cause.
    pub fn is_permanent(&self) -> bool {
        match self {
            AwaitError::Task(e) => e.is_permanent(),
            AwaitError::Retry(r) => r.last_error.is_permanent(),
            _ => false,
        }
    }

    /// Returns the task error for verbatim failures.
    pub fn as_task_error(&self) -> Option<&TaskError> {
        match self {
            AwaitError::Task(e) => Some(e),
            _ => None,
        }
    }
}

pub(crate) fn chain_find<'a, E>(err: &'a (dyn StdError + 'static)) -> Option<&'a E>
where
    E: StdError + 'static,
{
    let mut cur = Some(err);
    while let Some(e) = cur {
        if let Some(hit) = e.downcast_ref::<E>() {
            return Some(hit);
        }
        cur = e.source();
    }
    None
}

fn chain_contains<E: StdError + 'static>(err: &(dyn StdError + 'static)) -> bool {
    chain_find::<E>(err).is_some()
}
