use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    db::{
        error::{DbError, DbResult},
        repos::{CustomerRepo, validate_input},
    },
    models::{CreateCustomer, Customer},
};

pub struct PostgresCustomerRepo {
    write_pool: PgPool,
    read_pool: PgPool,
}

impl PostgresCustomerRepo {
    pub fn new(write_pool: PgPool, read_pool: Option<PgPool>) -> Self {
        let read_pool = read_pool.unwrap_or_else(|| write_pool.clone());
        Self {
            write_pool,
            read_pool,
        }
    }

    fn customer_from_row(row: &PgRow) -> Customer {
        Customer {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            phone: row.get("phone"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl CustomerRepo for PostgresCustomerRepo {
    async fn create(&self, input: CreateCustomer) -> DbResult<Customer> {
        validate_input(&input)?;

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, phone, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(now)
        .bind(now)
        .execute(&self.write_pool)
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
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.read_pool)
        .await?;

        Ok(row.as_ref().map(Self::customer_from_row))
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, phone, created_at, updated_at
            FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.read_pool)
        .await?;

        Ok(row.as_ref().map(Self::customer_from_row))
    }

    async fn count(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM customers")
            .fetch_one(&self.read_pool)
            .await?;
        Ok(row.get("count"))
    }

    async fn count_inactive(&self, cutoff: DateTime<Utc>) -> DbResult<i64> {
        // Read from the primary: the count decides what a cleanup run would delete.
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM customers c
            WHERE NOT EXISTS (
                SELECT 1 FROM orders o
                WHERE o.customer_id = c.id
                  AND o.created_at >= $1
            )
            "#,
        )
        .bind(cutoff)
        .fetch_one(&self.write_pool)
        .await?;

        Ok(row.get("count"))
    }

    async fn delete_inactive(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM customers c
            WHERE NOT EXISTS (
                SELECT 1 FROM orders o
                WHERE o.customer_id = c.id
                  AND o.created_at >= $1
            )
            "#,
        )
        .bind(cutoff)
        .execute(&self.write_pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM customers")
            .execute(&self.write_pool)
            .await?;
        Ok(result.rows_affected())
    }
}
