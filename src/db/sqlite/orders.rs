use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::{OrderRepo, validate_input},
    },
    models::{
        CreateOrder, Order, OrderItem, OrderReminder,
        money::{from_cents, to_cents},
    },
};

pub struct SqliteOrderRepo {
    pool: SqlitePool,
}

impl SqliteOrderRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn order_from_row(row: &SqliteRow, items: Vec<OrderItem>) -> DbResult<Order> {
        Ok(Order {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            customer_id: parse_uuid(&row.get::<String, _>("customer_id"))?,
            total_amount: from_cents(row.get("total_amount_cents")),
            order_date: row.get("order_date"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            items,
        })
    }

    async fn items_for(&self, order_id: Uuid) -> DbResult<Vec<OrderItem>> {
        let rows = sqlx::query(
            r#"
            SELECT product_id, quantity
            FROM order_products
            WHERE order_id = ?
            ORDER BY product_id
            "#,
        )
        .bind(order_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(OrderItem {
                    product_id: parse_uuid(&row.get::<String, _>("product_id"))?,
                    quantity: row.get("quantity"),
                })
            })
            .collect()
    }
}

/// Map constraint violations raised while writing an order.
fn map_order_write_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            DbError::NotFound("Order customer or product".into())
        }
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            DbError::Conflict("Order contains the same product more than once".into())
        }
        _ => DbError::from(e),
    }
}

#[async_trait]
impl OrderRepo for SqliteOrderRepo {
    async fn create(&self, input: CreateOrder) -> DbResult<Order> {
        validate_input(&input)?;
        let total_cents = to_cents(input.total_amount)
            .ok_or_else(|| DbError::Validation("Order total is out of range".into()))?;

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let placed_at = input.placed_at.unwrap_or(now);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, total_amount_cents, order_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(input.customer_id.to_string())
        .bind(total_cents)
        .bind(placed_at)
        .bind(placed_at)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(map_order_write_error)?;

        for item in &input.items {
            sqlx::query(
                r#"
                INSERT INTO order_products (order_id, product_id, quantity)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(id.to_string())
            .bind(item.product_id.to_string())
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(map_order_write_error)?;
        }

        tx.commit().await?;

        Ok(Order {
            id,
            customer_id: input.customer_id,
            total_amount: from_cents(total_cents),
            order_date: placed_at,
            created_at: placed_at,
            updated_at: now,
            items: input.items,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, total_amount_cents, order_date, created_at, updated_at
            FROM orders
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.items_for(id).await?;
                Ok(Some(Self::order_from_row(&row, items)?))
            }
            None => Ok(None),
        }
    }

    async fn count(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    async fn total_revenue(&self) -> DbResult<Decimal> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(total_amount_cents), 0) AS total_cents FROM orders",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(from_cents(row.get("total_cents")))
    }

    async fn list_placed_since(&self, since: DateTime<Utc>) -> DbResult<Vec<OrderReminder>> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, c.email, o.order_date
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.order_date >= ?
            ORDER BY o.order_date ASC, o.id ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(OrderReminder {
                    order_id: parse_uuid(&row.get::<String, _>("id"))?,
                    customer_email: row.get("email"),
                    order_date: row.get("order_date"),
                })
            })
            .collect()
    }
}
