//! Retry and backoff policy for calls to remote services.
//!
//! Used by the click counter; every failure is considered transient and
//! retried with a linear backoff until the attempt budget runs out.

mod policy;
mod run;

pub use policy::{RetryDecision, RetryPolicy};
pub use run::run_with_retry;
