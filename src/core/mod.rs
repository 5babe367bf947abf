//! Join combinators.
//!
//! Each combinator launches every task on its own tokio task and applies one
//! completion policy:
//! - [`all`]: settle everything, one result per task in input order;
//! - [`try_all`]: fail fast on the first error, aggregate genuine failures;
//! - [`any`]: first success wins, failures aggregated in completion order;
//! - [`race`]: first settled outcome wins, verbatim.
//!
//! Internal modules:
//! - [`runner`]: runs one task unit (scope check, panic isolation, indexed reporting).

mod all;
mod any;
mod race;
mod runner;

#[cfg(test)]
mod testing;

pub use all::{all, try_all};
pub use any::any;
pub use race::race;
