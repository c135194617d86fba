use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validators::validate_amount;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// A product line within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct OrderItem {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrder {
    pub customer_id: Uuid,
    #[validate(custom(function = "validate_amount"))]
    pub total_amount: Decimal,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<OrderItem>,
    /// When the order was placed. Defaults to now; set it when importing
    /// historical orders.
    #[serde(default)]
    pub placed_at: Option<DateTime<Utc>>,
}

/// An order recently placed, with the address to remind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReminder {
    pub order_id: Uuid,
    pub customer_email: String,
    pub order_date: DateTime<Utc>,
}
