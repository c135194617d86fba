use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

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

pub struct PostgresProductRepo {
    write_pool: PgPool,
    read_pool: PgPool,
}

impl PostgresProductRepo {
    pub fn new(write_pool: PgPool, read_pool: Option<PgPool>) -> Self {
        let read_pool = read_pool.unwrap_or_else(|| write_pool.clone());
        Self {
            write_pool,
            read_pool,
        }
    }

    fn product_from_row(row: &PgRow) -> Product {
        Product {
            id: row.get("id"),
            name: row.get("name"),
            price: from_cents(row.get("price_cents")),
            stock: row.get("stock"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl ProductRepo for PostgresProductRepo {
    async fn create(&self, input: CreateProduct) -> DbResult<Product> {
        validate_input(&input)?;
        let price_cents = to_cents(input.price)
            .ok_or_else(|| DbError::Validation("Product price is out of range".into()))?;

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, stock, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(price_cents)
        .bind(input.stock)
        .bind(now)
        .bind(now)
        .execute(&self.write_pool)
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
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.read_pool)
        .await?;

        Ok(row.as_ref().map(Self::product_from_row))
    }

    async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price_cents, stock, created_at, updated_at
            FROM products
            WHERE name = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.read_pool)
        .await?;

        Ok(row.as_ref().map(Self::product_from_row))
    }

    async fn count(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM products")
            .fetch_one(&self.read_pool)
            .await?;
        Ok(row.get("count"))
    }

    async fn list_low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        // Primary pool: the result feeds straight into restock updates.
        let rows = sqlx::query(
            r#"
            SELECT id, name, price_cents, stock, created_at, updated_at
            FROM products
            WHERE stock < $1
            ORDER BY stock ASC, name ASC
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.write_pool)
        .await?;

        Ok(rows.iter().map(Self::product_from_row).collect())
    }

    async fn restock(&self, id: Uuid, increment: i64) -> DbResult<Product> {
        let now = chrono::Utc::now();

        let row = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + $1, updated_at = $2
            WHERE id = $3
            RETURNING id, name, price_cents, stock, created_at, updated_at
            "#,
        )
        .bind(increment)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.write_pool)
        .await?;

        match row {
            Some(row) => Ok(Self::product_from_row(&row)),
            None => Err(DbError::NotFound(format!("Product {id}"))),
        }
    }

    async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM products")
            .execute(&self.write_pool)
            .await?;
        Ok(result.rows_affected())
    }
}
