//! Scheduled maintenance jobs for the CRM database.
//!
//! - **Cleanup**: deletes customers with no recent orders.
//! - **Reminders**: logs orders placed in the last few days.
//! - **Report**: logs customer, order and revenue totals.
//! - **Restock**: tops up products whose stock fell below a threshold.
//!
//! Jobs follow a consistent pattern:
//! 1. Configuration in `config/jobs.rs`
//! 2. A run function that performs a single pass against the repositories
//! 3. Structured result type for the caller to report on
//! 4. Activity log lines for operators, `tracing` events for diagnostics
//!
//! Each run function takes the current time explicitly so a pass is
//! reproducible in tests.
//!
//! # Example
//!
//! ```toml
//! [cleanup]
//! inactive_days = 365
//! log_path = "/tmp/customer_cleanup_log.txt"
//!
//! [restock]
//! threshold = 10
//! increment_by = 10
//! ```

mod cleanup;
mod reminders;
mod report;
mod restock;

pub use cleanup::{CleanupRunResult, run_cleanup};
pub use reminders::{RemindersRunResult, run_reminders};
pub use report::{CrmReport, run_report};
pub use restock::{RestockRunResult, run_restock};

use crate::{activity_log::ActivityLogError, db::DbError};

/// Errors that abort a job run.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error(transparent)]
    ActivityLog(#[from] ActivityLogError),
}
