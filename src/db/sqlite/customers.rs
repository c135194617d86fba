use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::{CustomerRepo, validate_input},
    },
    models::{CreateCustomer, Customer},
};

pub struct SqliteCustomerRepo {
    pool: SqlitePool,
}

impl SqliteCustomerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn customer_from_row(row: &SqliteRow) -> DbResult<Customer> {
        Ok(Customer {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            name: row.get("name"),
            email: row.get("email"),
            phone: row.get("phone"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl CustomerRepo for SqliteCustomerRepo {
    async fn create(&self, input: CreateCustomer) -> DbResult<Customer> {
        validate_input(&input)?;

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, phone, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Conflict(
                format!("Customer with email '{}' already exists", input.email),
            ),
            _ => DbError::from(e),
        })?;

        Ok(Customer {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, phone, created_at, updated_at
            FROM customers
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::customer_from_row).transpose()
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, phone, created_at, updated_at
            FROM customers
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::customer_from_row).transpose()
    }

    async fn count(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    async fn count_inactive(&self, cutoff: DateTime<Utc>) -> DbResult<i64> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM customers
            WHERE NOT EXISTS (
                SELECT 1 FROM orders
                WHERE orders.customer_id = customers.id
                  AND orders.created_at >= ?
            )
            "#,
        )
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("count"))
    }

    async fn delete_inactive(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM customers
            WHERE NOT EXISTS (
                SELECT 1 FROM orders
                WHERE orders.customer_id = customers.id
                  AND orders.created_at >= ?
            )
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM customers")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
