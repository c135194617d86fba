//! Scheduled job configuration.
//!
//! # Example
//!
//! ```toml
//! [cleanup]
//! inactive_days = 365
//! log_path = "/tmp/customer_cleanup_log.txt"
//! dry_run = false
//!
//! [reminders]
//! lookback_days = 7
//!
//! [report]
//! log_path = "logs/crm_report_log.txt"
//!
//! [restock]
//! threshold = 10
//! increment_by = 10
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Inactive customer cleanup.
///
/// A customer is inactive when none of their orders was created within the
/// last `inactive_days` days. Customers that never ordered are inactive too.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanupConfig {
    /// Days without a new order after which a customer is deleted.
    /// Default: 365
    #[serde(default = "default_inactive_days")]
    pub inactive_days: u32,

    /// Activity log receiving one line per run.
    #[serde(default = "default_cleanup_log_path")]
    pub log_path: PathBuf,

    /// If true, count eligible customers without deleting them.
    /// Nothing is appended to the activity log.
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            inactive_days: default_inactive_days(),
            log_path: default_cleanup_log_path(),
            dry_run: false,
        }
    }
}

impl CleanupConfig {
    /// Orders created at or after the cutoff keep their customer.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.inactive_days as i64)
    }
}

fn default_inactive_days() -> u32 {
    365
}

fn default_cleanup_log_path() -> PathBuf {
    PathBuf::from("/tmp/customer_cleanup_log.txt")
}

/// Reminders for recently placed orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemindersConfig {
    /// Orders placed within this many days get a reminder line.
    /// Default: 7
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    #[serde(default = "default_reminders_log_path")]
    pub log_path: PathBuf,
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            log_path: default_reminders_log_path(),
        }
    }
}

impl RemindersConfig {
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.lookback_days as i64)
    }
}

fn default_lookback_days() -> u32 {
    7
}

fn default_reminders_log_path() -> PathBuf {
    PathBuf::from("/tmp/order_reminders_log.txt")
}

/// Customer, order and revenue totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default = "default_report_log_path")]
    pub log_path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            log_path: default_report_log_path(),
        }
    }
}

fn default_report_log_path() -> PathBuf {
    PathBuf::from("/tmp/crm_report_log.txt")
}

/// Automatic restocking of low-stock products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestockConfig {
    /// Products with stock strictly below this value are restocked.
    /// Default: 10
    #[serde(default = "default_threshold")]
    pub threshold: i64,

    /// Units added to each low-stock product.
    /// Default: 10
    #[serde(default = "default_increment_by")]
    pub increment_by: i64,

    #[serde(default = "default_restock_log_path")]
    pub log_path: PathBuf,

    /// If true, report the new stock levels without saving them.
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for RestockConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            increment_by: default_increment_by(),
            log_path: default_restock_log_path(),
            dry_run: false,
        }
    }
}

fn default_threshold() -> i64 {
    10
}

fn default_increment_by() -> i64 {
    10
}

fn default_restock_log_path() -> PathBuf {
    PathBuf::from("/tmp/low_stock_updates_log.txt")
}

/// Resolve a relative log path against the project root.
pub(super) fn rooted(path: &mut PathBuf, root: &Path) {
    if path.is_relative() {
        *path = root.join(&*path);
    }
}

fn require_log_path(section: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{section}.log_path cannot be empty"
        )));
    }
    Ok(())
}

impl CleanupConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.inactive_days == 0 {
            return Err(ConfigError::Validation(
                "cleanup.inactive_days must be at least 1".into(),
            ));
        }
        require_log_path("cleanup", &self.log_path)
    }
}

impl RemindersConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_days == 0 {
            return Err(ConfigError::Validation(
                "reminders.lookback_days must be at least 1".into(),
            ));
        }
        require_log_path("reminders", &self.log_path)
    }
}

impl ReportConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        require_log_path("report", &self.log_path)
    }
}

impl RestockConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold <= 0 {
            return Err(ConfigError::Validation(
                "restock.threshold must be positive".into(),
            ));
        }
        if self.increment_by <= 0 {
            return Err(ConfigError::Validation(
                "restock.increment_by must be positive".into(),
            ));
        }
        require_log_path("restock", &self.log_path)
    }
}
