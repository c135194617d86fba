use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateCustomer, Customer},
};

#[async_trait]
pub trait CustomerRepo: Send + Sync {
    /// Create a customer. Fails with `DbError::Conflict` if the email is taken.
    async fn create(&self, input: CreateCustomer) -> DbResult<Customer>;
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Customer>>;
    async fn get_by_email(&self, email: &str) -> DbResult<Option<Customer>>;
    async fn count(&self) -> DbResult<i64>;

    // ==================== Retention Operations ====================

    /// Count customers with no order created at or after `cutoff`.
    ///
    /// Customers that never ordered are included.
    async fn count_inactive(&self, cutoff: DateTime<Utc>) -> DbResult<i64>;

    /// Delete customers with no order created at or after `cutoff`.
    ///
    /// Runs as a single statement. Orders of deleted customers go with them
    /// through the foreign key cascade. Returns the number of customers deleted.
    async fn delete_inactive(&self, cutoff: DateTime<Utc>) -> DbResult<u64>;

    /// Delete every customer (and, by cascade, every order).
    async fn delete_all(&self) -> DbResult<u64>;
}
