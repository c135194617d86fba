use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

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

pub struct PostgresOrderRepo {
    write_pool: PgPool,
    read_pool: PgPool,
}

impl PostgresOrderRepo {
    pub fn new(write_pool: PgPool, read_pool: Option<PgPool>) -> Self {
        let read_pool = read_pool.unwrap_or_else(|| write_pool.clone());
        Self {
            write_pool,
            read_pool,
        }
    }

    fn order_from_row(row: &PgRow, items: Vec<OrderItem>) -> Order {
        Order {
            id: row.get("id"),
            customer_id: row.get("customer_id"),
            total_amount: from_cents(row.get("total_amount_cents")),
            order_date: row.get("order_date"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            items,
        }
    }

    async fn items_for(&self, order_id: Uuid) -> DbResult<Vec<OrderItem>> {
        let rows = sqlx::query(
            r#"
            SELECT product_id, quantity
            FROM order_products
            WHERE order_id = $1
            ORDER BY product_id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.read_pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| OrderItem {
                product_id: row.get("product_id"),
                quantity: row.get("quantity"),
            })
            .collect())
    }
}

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
impl OrderRepo for PostgresOrderRepo {
    async fn create(&self, input: CreateOrder) -> DbResult<Order> {
        validate_input(&input)?;
        let total_cents = to_cents(input.total_amount)
            .ok_or_else(|| DbError::Validation("Order total is out of range".into()))?;

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let placed_at = input.placed_at.unwrap_or(now);

        let mut tx = self.write_pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, total_amount_cents, order_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(input.customer_id)
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
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(id)
            .bind(item.product_id)
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
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.read_pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.items_for(id).await?;
                Ok(Some(Self::order_from_row(&row, items)))
            }
            None => Ok(None),
        }
    }

    async fn count(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM orders")
            .fetch_one(&self.read_pool)
            .await?;
        Ok(row.get("count"))
    }

    async fn total_revenue(&self) -> DbResult<Decimal> {
        // SUM(BIGINT) is NUMERIC in PostgreSQL
        let row = sqlx::query(
            "SELECT COALESCE(SUM(total_amount_cents), 0)::BIGINT AS total_cents FROM orders",
        )
        .fetch_one(&self.read_pool)
        .await?;
        Ok(from_cents(row.get("total_cents")))
    }

    async fn list_placed_since(&self, since: DateTime<Utc>) -> DbResult<Vec<OrderReminder>> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, c.email, o.order_date
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.order_date >= $1
            ORDER BY o.order_date ASC, o.id ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.read_pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| OrderReminder {
                order_id: row.get("id"),
                customer_email: row.get("email"),
                order_date: row.get("order_date"),
            })
            .collect())
    }
}
