//! Structured logging for the jobs.
//!
//! Diagnostics go through `tracing` to stderr. The operator-facing activity
//! log lives in [`crate::activity_log`] and is not affected by these settings.

mod tracing_init;

pub use tracing_init::*;
