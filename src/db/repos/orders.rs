use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateOrder, Order, OrderReminder},
};

#[async_trait]
pub trait OrderRepo: Send + Sync {
    /// Create an order and its product lines in one transaction.
    ///
    /// Fails with `DbError::NotFound` if the customer or a product does not exist.
    async fn create(&self, input: CreateOrder) -> DbResult<Order>;
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Order>>;
    async fn count(&self) -> DbResult<i64>;

    /// Sum of `total_amount` over all orders, zero when there are none.
    async fn total_revenue(&self) -> DbResult<Decimal>;

    /// Orders with `order_date >= since`, oldest first, with the customer's email.
    async fn list_placed_since(&self, since: DateTime<Utc>) -> DbResult<Vec<OrderReminder>>;
}
