//! Inactive customer cleanup.
//!
//! A single pass:
//! 1. Computes the cutoff, `now - inactive_days`
//! 2. Deletes every customer with no order created at or after the cutoff,
//!    in one statement (their orders go with them by cascade)
//! 3. Appends `Deleted <count> inactive customers` to the activity log
//!
//! Customers who never ordered are inactive. If the delete fails nothing is
//! appended, so the log never records a count that was not observed. Dry run
//! mode only counts.

use std::time::Instant;

use chrono::{DateTime, Utc};

use super::JobError;
use crate::{activity_log::ActivityLog, config::CleanupConfig, db::CustomerRepo};

/// Results from a single cleanup run.
#[derive(Debug)]
pub struct CleanupRunResult {
    /// Orders created before this instant do not keep a customer active.
    pub cutoff: DateTime<Utc>,
    /// Customers deleted, or that would have been deleted in dry run mode.
    pub customers_deleted: u64,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Duration of the run in milliseconds.
    pub duration_ms: u64,
}

impl CleanupRunResult {
    /// The activity log message for this run.
    pub fn log_message(&self) -> String {
        format!("Deleted {} inactive customers", self.customers_deleted)
    }
}

/// Run a single cleanup pass.
pub async fn run_cleanup(
    customers: &dyn CustomerRepo,
    config: &CleanupConfig,
    now: DateTime<Utc>,
) -> Result<CleanupRunResult, JobError> {
    let start = Instant::now();
    let cutoff = config.cutoff(now);

    tracing::debug!(
        inactive_days = config.inactive_days,
        cutoff = %cutoff,
        dry_run = config.dry_run,
        "Starting inactive customer cleanup"
    );

    let customers_deleted = if config.dry_run {
        let count = customers.count_inactive(cutoff).await?;
        tracing::info!(
            cutoff = %cutoff,
            would_delete = count,
            "Dry run: would delete inactive customers"
        );
        count.max(0) as u64
    } else {
        customers.delete_inactive(cutoff).await?
    };

    let result = CleanupRunResult {
        cutoff,
        customers_deleted,
        dry_run: config.dry_run,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    if !result.dry_run {
        ActivityLog::new(&config.log_path).append(&result.log_message())?;
        tracing::info!(
            customers_deleted = result.customers_deleted,
            log_path = %config.log_path.display(),
            duration_ms = result.duration_ms,
            "Inactive customer cleanup complete"
        );
    }

    Ok(result)
}
