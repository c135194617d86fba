//! Recent order reminders.
//!
//! Appends one `Order ID: <id>, Customer Email: <email>` line per order placed
//! within the lookback window. A failed lookup is logged and treated as no
//! orders: the run still completes and the log file is still touched.

use chrono::{DateTime, Local, Utc};

use super::JobError;
use crate::{activity_log::ActivityLog, config::RemindersConfig, db::OrderRepo, models::OrderReminder};

/// Results from a single reminders run.
#[derive(Debug)]
pub struct RemindersRunResult {
    /// Orders placed at or after this instant were included.
    pub since: DateTime<Utc>,
    /// Number of reminder lines written.
    pub orders_logged: usize,
    /// Whether the order lookup failed.
    pub lookup_failed: bool,
}

fn reminder_line(reminder: &OrderReminder) -> String {
    format!(
        "Order ID: {}, Customer Email: {}",
        reminder.order_id, reminder.customer_email
    )
}

/// Run a single reminders pass.
pub async fn run_reminders(
    orders: &dyn OrderRepo,
    config: &RemindersConfig,
    now: DateTime<Utc>,
) -> Result<RemindersRunResult, JobError> {
    let since = config.since(now);

    let (reminders, lookup_failed) = match orders.list_placed_since(since).await {
        Ok(reminders) => (reminders, false),
        Err(e) => {
            tracing::error!(error = %e, since = %since, "Error fetching recent orders");
            (Vec::new(), true)
        }
    };

    let orders_logged = ActivityLog::new(&config.log_path).append_all(
        now.with_timezone(&Local),
        reminders.iter().map(reminder_line),
    )?;

    tracing::info!(
        lookback_days = config.lookback_days,
        orders_logged,
        log_path = %config.log_path.display(),
        "Order reminders processed"
    );

    Ok(RemindersRunResult {
        since,
        orders_logged,
        lookup_failed,
    })
}

#[cfg(all(test, feature = "database-sqlite"))]
mod tests {
    use chrono::Duration;
    use rust_decimal::dec;

    use super::*;
    use crate::{
        db::{DbPool, tests::harness::create_sqlite_pool},
        models::{CreateCustomer, CreateOrder},
    };

    async fn create_db() -> DbPool {
        let db = DbPool::from_sqlite(create_sqlite_pool().await);
        db.run_migrations().await.expect("Failed to run migrations");
        db
    }

    async fn place_order(db: &DbPool, email: &str, placed_at: DateTime<Utc>) -> uuid::Uuid {
        let customer = match db.customers().get_by_email(email).await.unwrap() {
            Some(c) => c,
            None => db
                .customers()
                .create(CreateCustomer {
                    name: "Customer".into(),
                    email: email.into(),
                    phone: None,
                })
                .await
                .unwrap(),
        };
        db.orders()
            .create(CreateOrder {
                customer_id: customer.id,
                total_amount: dec!(12.50),
                items: vec![],
                placed_at: Some(placed_at),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_logs_recent_orders_only() {
        let db = create_db().await;
        let dir = tempfile::tempdir().unwrap();
        let config = RemindersConfig {
            log_path: dir.path().join("order_reminders_log.txt"),
            ..Default::default()
        };
        let now = Utc::now();

        let recent = place_order(&db, "alice@example.com", now - Duration::days(2)).await;
        place_order(&db, "bob@example.com", now - Duration::days(8)).await;

        let result = run_reminders(db.orders().as_ref(), &config, now).await.unwrap();
        assert_eq!(result.orders_logged, 1);
        assert!(!result.lookup_failed);

        let contents = std::fs::read_to_string(&config.log_path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(&format!(
            " - Order ID: {recent}, Customer Email: alice@example.com"
        )));
    }

    #[tokio::test]
    async fn test_lines_share_timestamp() {
        let db = create_db().await;
        let dir = tempfile::tempdir().unwrap();
        let config = RemindersConfig {
            log_path: dir.path().join("order_reminders_log.txt"),
            ..Default::default()
        };
        let now = Utc::now();

        place_order(&db, "alice@example.com", now - Duration::days(1)).await;
        place_order(&db, "bob@example.com", now - Duration::days(3)).await;

        run_reminders(db.orders().as_ref(), &config, now).await.unwrap();

        let contents = std::fs::read_to_string(&config.log_path).unwrap();
        let stamps: Vec<_> = contents.lines().map(|l| &l[..19]).collect();
        assert_eq!(stamps.len(), 2);
        assert_eq!(stamps[0], stamps[1]);
    }

    #[tokio::test]
    async fn test_lookup_failure_writes_nothing() {
        let db = create_db().await;
        let dir = tempfile::tempdir().unwrap();
        let config = RemindersConfig {
            log_path: dir.path().join("order_reminders_log.txt"),
            ..Default::default()
        };
        db.close().await;

        let result = run_reminders(db.orders().as_ref(), &config, Utc::now())
            .await
            .unwrap();

        assert!(result.lookup_failed);
        assert_eq!(result.orders_logged, 0);
        assert_eq!(std::fs::read_to_string(&config.log_path).unwrap(), "");
    }
}
