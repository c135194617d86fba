//! Shared tests for ProductRepo implementations

use rust_decimal::{Decimal, dec};
use uuid::Uuid;

use super::RepoTestContext;
use crate::{db::DbError, models::CreateProduct};

pub async fn test_create_and_get_product(ctx: &RepoTestContext<'_>) {
    let product = ctx
        .products
        .create(CreateProduct {
            name: "Laptop".to_string(),
            price: dec!(999.99),
            stock: 10,
        })
        .await
        .expect("Failed to create product");

    assert_eq!(product.price, dec!(999.99));
    assert_eq!(product.stock, 10);

    let fetched = ctx
        .products
        .get_by_id(product.id)
        .await
        .unwrap()
        .expect("Product should exist");
    assert_eq!(fetched.name, "Laptop");
    assert_eq!(fetched.price, dec!(999.99));

    let by_name = ctx
        .products
        .get_by_name("Laptop")
        .await
        .unwrap()
        .expect("Product should exist");
    assert_eq!(by_name.id, product.id);
}

pub async fn test_create_product_invalid_input(ctx: &RepoTestContext<'_>) {
    let cases = [
        CreateProduct {
            name: String::new(),
            price: dec!(1.00),
            stock: 0,
        },
        CreateProduct {
            name: "Free".to_string(),
            price: dec!(0),
            stock: 0,
        },
        CreateProduct {
            name: "Negative".to_string(),
            price: dec!(1.00),
            stock: -1,
        },
    ];

    for input in cases {
        let result = ctx.products.create(input).await;
        assert!(matches!(result, Err(DbError::Validation(_))));
    }
    assert_eq!(ctx.products.count().await.unwrap(), 0);
}

pub async fn test_get_product_not_found(ctx: &RepoTestContext<'_>) {
    assert!(ctx.products.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
    assert!(ctx.products.get_by_name("Nothing").await.unwrap().is_none());
}

pub async fn test_list_low_stock(ctx: &RepoTestContext<'_>) {
    ctx.product("Laptop", dec!(999.99), 10).await;
    ctx.product("Cable", dec!(4.99), 3).await;
    ctx.product("Mouse", dec!(29.99), 50).await;
    ctx.product("Adapter", dec!(9.99), 0).await;

    let low = ctx.products.list_low_stock(10).await.unwrap();
    let names: Vec<_> = low.iter().map(|p| p.name.as_str()).collect();

    // Strictly below the threshold, lowest stock first
    assert_eq!(names, vec!["Adapter", "Cable"]);
}

pub async fn test_restock(ctx: &RepoTestContext<'_>) {
    let id = ctx.product("Cable", dec!(4.99), 3).await;

    let updated = ctx.products.restock(id, 10).await.unwrap();
    assert_eq!(updated.stock, 13);
    assert_eq!(updated.price, dec!(4.99));

    let fetched = ctx.products.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(fetched.stock, 13);
    assert!(fetched.updated_at >= fetched.created_at);
}

pub async fn test_restock_missing_product(ctx: &RepoTestContext<'_>) {
    let result = ctx.products.restock(Uuid::new_v4(), 10).await;
    assert!(matches!(result, Err(DbError::NotFound(_))));
}

pub async fn test_create_product_price_out_of_range(ctx: &RepoTestContext<'_>) {
    let result = ctx
        .products
        .create(CreateProduct {
            name: "Priceless".to_string(),
            price: Decimal::MAX,
            stock: 1,
        })
        .await;

    assert!(matches!(result, Err(DbError::Validation(_))));
    assert_eq!(ctx.products.count().await.unwrap(), 0);
}

pub async fn test_delete_all_products(ctx: &RepoTestContext<'_>) {
    ctx.product("Laptop", dec!(999.99), 10).await;
    ctx.product("Mouse", dec!(29.99), 50).await;

    assert_eq!(ctx.products.delete_all().await.unwrap(), 2);
    assert_eq!(ctx.products.count().await.unwrap(), 0);
}

// ============================================================================
// SQLite Tests
// ============================================================================

#[cfg(feature = "database-sqlite")]
mod sqlite_tests {
    use crate::db::tests::sqlite_test;

    sqlite_test!(test_create_and_get_product);
    sqlite_test!(test_create_product_invalid_input);
    sqlite_test!(test_get_product_not_found);
    sqlite_test!(test_list_low_stock);
    sqlite_test!(test_restock);
    sqlite_test!(test_restock_missing_product);
    sqlite_test!(test_create_product_price_out_of_range);
    sqlite_test!(test_delete_all_products);
}

// ============================================================================
// PostgreSQL Tests
// ============================================================================

#[cfg(feature = "database-postgres")]
mod postgres_tests {
    use crate::db::tests::postgres_test;

    postgres_test!(test_create_and_get_product);
    postgres_test!(test_create_product_invalid_input);
    postgres_test!(test_get_product_not_found);
    postgres_test!(test_list_low_stock);
    postgres_test!(test_restock);
    postgres_test!(test_restock_missing_product);
    postgres_test!(test_create_product_price_out_of_range);
    postgres_test!(test_delete_all_products);
}
