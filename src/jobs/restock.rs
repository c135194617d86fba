//! Low-stock restocking.
//!
//! Every product with `stock < threshold` gets `increment_by` added with an
//! atomic update. A product that fails to update is logged and skipped; the
//! others still go through. Dry run mode reports the would-be levels without
//! writing anything.

use chrono::{DateTime, Local, Utc};

use super::JobError;
use crate::{
    activity_log::ActivityLog, config::RestockConfig, db::ProductRepo, models::RestockedProduct,
};

/// Results from a single restock run.
#[derive(Debug)]
pub struct RestockRunResult {
    pub threshold: i64,
    /// Products updated, or that would be updated in dry run mode.
    pub products: Vec<RestockedProduct>,
    /// Products found below the threshold that could not be updated.
    pub failed: usize,
    pub dry_run: bool,
}

impl RestockRunResult {
    pub fn updated_count(&self) -> usize {
        self.products.len()
    }

    /// Human-readable outcome of the run.
    pub fn summary(&self) -> String {
        if self.dry_run {
            format!(
                "Dry run: Would update {} products below stock threshold {}",
                self.updated_count(),
                self.threshold
            )
        } else if self.products.is_empty() {
            "No products found below the stock threshold".to_string()
        } else {
            format!(
                "Successfully updated {} low-stock products",
                self.updated_count()
            )
        }
    }
}

fn restock_line(product: &RestockedProduct) -> String {
    format!(
        "Restocked {}: {} -> {}",
        product.name, product.old_stock, product.new_stock
    )
}

/// Run a single restock pass.
pub async fn run_restock(
    products: &dyn ProductRepo,
    config: &RestockConfig,
    now: DateTime<Utc>,
) -> Result<RestockRunResult, JobError> {
    let low_stock = products.list_low_stock(config.threshold).await?;

    tracing::debug!(
        threshold = config.threshold,
        found = low_stock.len(),
        dry_run = config.dry_run,
        "Found low-stock products"
    );

    let mut result = RestockRunResult {
        threshold: config.threshold,
        products: Vec::with_capacity(low_stock.len()),
        failed: 0,
        dry_run: config.dry_run,
    };

    if config.dry_run {
        result.products = low_stock
            .into_iter()
            .map(|p| RestockedProduct {
                new_stock: p.stock + config.increment_by,
                old_stock: p.stock,
                id: p.id,
                name: p.name,
            })
            .collect();
        return Ok(result);
    }

    for product in low_stock {
        match products.restock(product.id, config.increment_by).await {
            Ok(updated) => result.products.push(RestockedProduct {
                id: updated.id,
                name: updated.name,
                old_stock: product.stock,
                new_stock: updated.stock,
            }),
            Err(e) => {
                tracing::warn!(
                    product_id = %product.id,
                    error = %e,
                    "Error updating product, skipping"
                );
                result.failed += 1;
            }
        }
    }

    if !result.products.is_empty() {
        ActivityLog::new(&config.log_path)
            .append_all(now.with_timezone(&Local), result.products.iter().map(restock_line))?;
    }

    tracing::info!(
        updated = result.updated_count(),
        failed = result.failed,
        increment_by = config.increment_by,
        "Low-stock restock complete"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::{
        db::{DbError, DbResult},
        models::{CreateProduct, Product},
    };

    /// In-memory product store whose `restock` fails for chosen products.
    #[derive(Default)]
    struct FakeProducts {
        products: Mutex<Vec<Product>>,
        failing: Vec<Uuid>,
    }

    impl FakeProducts {
        fn with(stock: &[(&str, i64)]) -> Self {
            let now = Utc::now();
            let products = stock
                .iter()
                .map(|(name, stock)| Product {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    price: Decimal::new(999, 2),
                    stock: *stock,
                    created_at: now,
                    updated_at: now,
                })
                .collect();
            Self {
                products: Mutex::new(products),
                failing: Vec::new(),
            }
        }

        fn id_of(&self, name: &str) -> Uuid {
            self.products
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.name == name)
                .unwrap()
                .id
        }

        fn stock_of(&self, name: &str) -> i64 {
            self.products
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.name == name)
                .unwrap()
                .stock
        }
    }

    #[async_trait]
    impl ProductRepo for FakeProducts {
        async fn create(&self, _input: CreateProduct) -> DbResult<Product> {
            unimplemented!()
        }

        async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Product>> {
            Ok(self.products.lock().unwrap().iter().find(|p| p.id == id).cloned())
        }

        async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
            Ok(self
                .products
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.name == name)
                .cloned())
        }

        async fn count(&self) -> DbResult<i64> {
            Ok(self.products.lock().unwrap().len() as i64)
        }

        async fn list_low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
            let mut low: Vec<_> = self
                .products
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.stock < threshold)
                .cloned()
                .collect();
            low.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.name.cmp(&b.name)));
            Ok(low)
        }

        async fn restock(&self, id: Uuid, increment: i64) -> DbResult<Product> {
            if self.failing.contains(&id) {
                return Err(DbError::Internal("disk full".into()));
            }
            let mut products = self.products.lock().unwrap();
            let product = products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| DbError::NotFound(format!("Product {id}")))?;
            product.stock += increment;
            Ok(product.clone())
        }

        async fn delete_all(&self) -> DbResult<u64> {
            let mut products = self.products.lock().unwrap();
            let count = products.len() as u64;
            products.clear();
            Ok(count)
        }
    }

    fn config(dir: &std::path::Path) -> RestockConfig {
        RestockConfig {
            log_path: dir.join("low_stock_updates_log.txt"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_restocks_products_below_threshold() {
        let repo = FakeProducts::with(&[("Cable", 3), ("Laptop", 10), ("Adapter", 0)]);
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let result = run_restock(&repo, &config, Utc::now()).await.unwrap();

        assert_eq!(result.updated_count(), 2);
        assert_eq!(result.failed, 0);
        assert_eq!(result.summary(), "Successfully updated 2 low-stock products");
        assert_eq!(repo.stock_of("Adapter"), 10);
        assert_eq!(repo.stock_of("Cable"), 13);
        // At the threshold is not low stock
        assert_eq!(repo.stock_of("Laptop"), 10);

        let contents = std::fs::read_to_string(&config.log_path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - Restocked Adapter: 0 -> 10"));
        assert!(lines[1].ends_with(" - Restocked Cable: 3 -> 13"));
    }

    #[tokio::test]
    async fn test_failed_product_is_skipped() {
        let mut repo = FakeProducts::with(&[("Cable", 3), ("Adapter", 1)]);
        repo.failing.push(repo.id_of("Adapter"));
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let result = run_restock(&repo, &config, Utc::now()).await.unwrap();

        assert_eq!(result.updated_count(), 1);
        assert_eq!(result.failed, 1);
        assert_eq!(repo.stock_of("Adapter"), 1);
        assert_eq!(repo.stock_of("Cable"), 13);
    }

    #[tokio::test]
    async fn test_nothing_below_threshold() {
        let repo = FakeProducts::with(&[("Mouse", 50)]);
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let result = run_restock(&repo, &config, Utc::now()).await.unwrap();

        assert_eq!(result.updated_count(), 0);
        assert_eq!(result.summary(), "No products found below the stock threshold");
        assert!(!config.log_path.exists());
    }

    #[tokio::test]
    async fn test_dry_run_changes_nothing() {
        let repo = FakeProducts::with(&[("Cable", 3), ("Mouse", 50)]);
        let dir = tempfile::tempdir().unwrap();
        let config = RestockConfig {
            dry_run: true,
            increment_by: 5,
            ..config(dir.path())
        };

        let result = run_restock(&repo, &config, Utc::now()).await.unwrap();

        assert_eq!(
            result.summary(),
            "Dry run: Would update 1 products below stock threshold 10"
        );
        assert_eq!(result.products[0].old_stock, 3);
        assert_eq!(result.products[0].new_stock, 8);
        assert_eq!(repo.stock_of("Cable"), 3);
        assert!(!config.log_path.exists());
    }

    #[tokio::test]
    async fn test_custom_threshold() {
        let repo = FakeProducts::with(&[("Laptop", 10), ("Monitor", 15), ("Mouse", 50)]);
        let dir = tempfile::tempdir().unwrap();
        let config = RestockConfig {
            threshold: 20,
            increment_by: 1,
            ..config(dir.path())
        };

        let result = run_restock(&repo, &config, Utc::now()).await.unwrap();

        assert_eq!(result.updated_count(), 2);
        assert_eq!(repo.stock_of("Laptop"), 11);
        assert_eq!(repo.stock_of("Monitor"), 16);
        assert_eq!(repo.stock_of("Mouse"), 50);
    }
}
