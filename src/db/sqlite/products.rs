use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::{ProductRepo, validate_input},
    },
    models::{
        CreateProduct, Product,
        money::{from_cents, to_cents},
    },
};

pub struct SqliteProductRepo {
    pool: SqlitePool,
}

impl SqliteProductRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn product_from_row(row: &SqliteRow) -> DbResult<Product> {
        Ok(Product {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            name: row.get("name"),
            price: from_cents(row.get("price_cents")),
            stock: row.get("stock"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl ProductRepo for SqliteProductRepo {
    async fn create(&self, input: CreateProduct) -> DbResult<Product> {
        validate_input(&input)?;
        let price_cents = to_cents(input.price)
            .ok_or_else(|| DbError::Validation("Product price is out of range".into()))?;

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, stock, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.name)
        .bind(price_cents)
        .bind(input.stock)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id,
            name: input.name,
            price: from_cents(price_cents),
            stock: input.stock,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price_cents, stock, created_at, updated_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::product_from_row).transpose()
    }

    async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price_cents, stock, created_at, updated_at
            FROM products
            WHERE name = ?
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::product_from_row).transpose()
    }

    async fn count(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    async fn list_low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price_cents, stock, created_at, updated_at
            FROM products
            WHERE stock < ?
            ORDER BY stock ASC, name ASC
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::product_from_row).collect()
    }

    async fn restock(&self, id: Uuid, increment: i64) -> DbResult<Product> {
        let now = chrono::Utc::now();

        let row = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?, updated_at = ?
            WHERE id = ?
            RETURNING id, name, price_cents, stock, created_at, updated_at
            "#,
        )
        .bind(increment)
        .bind(now)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::product_from_row(&row),
            None => Err(DbError::NotFound(format!("Product {id}"))),
        }
    }

    async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
