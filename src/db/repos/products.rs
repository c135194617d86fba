use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateProduct, Product},
};

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn create(&self, input: CreateProduct) -> DbResult<Product>;
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Product>>;
    async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>>;
    async fn count(&self) -> DbResult<i64>;

    /// Products with `stock < threshold`, lowest stock first.
    async fn list_low_stock(&self, threshold: i64) -> DbResult<Vec<Product>>;

    /// Atomically add `increment` to a product's stock and return the updated product.
    async fn restock(&self, id: Uuid, increment: i64) -> DbResult<Product>;

    async fn delete_all(&self) -> DbResult<u64>;
}
