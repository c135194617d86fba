//! CRM totals report.

use rust_decimal::Decimal;

use super::JobError;
use crate::{
    activity_log::ActivityLog,
    config::ReportConfig,
    db::{CustomerRepo, DbResult, OrderRepo},
};

/// Totals at the time of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrmReport {
    pub customers: i64,
    pub orders: i64,
    pub revenue: Decimal,
}

impl CrmReport {
    pub fn log_message(&self) -> String {
        format!(
            "Report: {} customers, {} orders, {} revenue",
            self.customers, self.orders, self.revenue
        )
    }
}

async fn gather(customers: &dyn CustomerRepo, orders: &dyn OrderRepo) -> DbResult<CrmReport> {
    Ok(CrmReport {
        customers: customers.count().await?,
        orders: orders.count().await?,
        revenue: orders.total_revenue().await?,
    })
}

/// Compute the totals and append them to the report log.
///
/// When the totals cannot be computed an `Error generating report` line is
/// appended instead and the database error is returned.
pub async fn run_report(
    customers: &dyn CustomerRepo,
    orders: &dyn OrderRepo,
    config: &ReportConfig,
) -> Result<CrmReport, JobError> {
    let log = ActivityLog::new(&config.log_path);

    match gather(customers, orders).await {
        Ok(report) => {
            log.append(&report.log_message())?;
            tracing::info!(
                customers = report.customers,
                orders = report.orders,
                revenue = %report.revenue,
                "CRM report generated"
            );
            Ok(report)
        }
        Err(e) => {
            tracing::error!(error = %e, "Error generating report");
            log.append(&format!("Error generating report: {e}"))?;
            Err(e.into())
        }
    }
}
