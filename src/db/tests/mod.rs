//! Shared database repository test infrastructure
//!
//! The same test logic runs against both SQLite and PostgreSQL:
//!
//! - **SQLite**: in-memory databases, run with every `cargo test`
//! - **PostgreSQL**: testcontainers, run with `cargo test -- --ignored`
//!
//! Each repository has a test module containing shared test functions that
//! take a [`RepoTestContext`], plus `sqlite_test!`/`postgres_test!` macros
//! that build the context for each backend.

mod products;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    db::repos::{CustomerRepo, OrderRepo, ProductRepo},
    models::{CreateCustomer, CreateOrder, CreateProduct, OrderItem},
};

/// Repositories sharing one database.
pub struct RepoTestContext<'a> {
    pub customers: &'a dyn CustomerRepo,
    pub orders: &'a dyn OrderRepo,
    pub products: &'a dyn ProductRepo,
}

impl RepoTestContext<'_> {
    pub async fn customer(&self, name: &str, email: &str) -> Uuid {
        self.customers
            .create(CreateCustomer {
                name: name.to_string(),
                email: email.to_string(),
                phone: None,
            })
            .await
            .expect("Failed to create customer")
            .id
    }

    pub async fn product(&self, name: &str, price: Decimal, stock: i64) -> Uuid {
        self.products
            .create(CreateProduct {
                name: name.to_string(),
                price,
                stock,
            })
            .await
            .expect("Failed to create product")
            .id
    }

    pub async fn order(
        &self,
        customer_id: Uuid,
        total_amount: Decimal,
        items: Vec<OrderItem>,
        placed_at: Option<DateTime<Utc>>,
    ) -> Uuid {
        self.orders
            .create(CreateOrder {
                customer_id,
                total_amount,
                items,
                placed_at,
            })
            .await
            .expect("Failed to create order")
            .id
    }
}

/// Build a `RepoTestContext` over a migrated in-memory SQLite database and
/// run the named shared test function with it.
#[cfg(feature = "database-sqlite")]
macro_rules! sqlite_test {
    ($name:ident) => {
        #[tokio::test]
        async fn $name() {
            use crate::db::{
                sqlite::{SqliteCustomerRepo, SqliteOrderRepo, SqliteProductRepo},
                tests::harness::{create_sqlite_pool, run_sqlite_migrations},
            };

            let pool = create_sqlite_pool().await;
            run_sqlite_migrations(&pool).await;
            let customers = SqliteCustomerRepo::new(pool.clone());
            let orders = SqliteOrderRepo::new(pool.clone());
            let products = SqliteProductRepo::new(pool);
            let ctx = crate::db::tests::RepoTestContext {
                customers: &customers,
                orders: &orders,
                products: &products,
            };
            super::$name(&ctx).await;
        }
    };
}

/// Same as `sqlite_test!`, against an isolated schema in a PostgreSQL container.
#[cfg(feature = "database-postgres")]
macro_rules! postgres_test {
    ($name:ident) => {
        #[tokio::test]
        #[ignore = "Requires Docker - run with `cargo test -- --ignored`"]
        async fn $name() {
            use crate::db::{
                postgres::{PostgresCustomerRepo, PostgresOrderRepo, PostgresProductRepo},
                tests::harness::postgres::{
                    create_isolated_postgres_pool, run_postgres_migrations,
                },
            };

            let pool = create_isolated_postgres_pool().await;
            run_postgres_migrations(&pool).await;
            let customers = PostgresCustomerRepo::new(pool.clone(), None);
            let orders = PostgresOrderRepo::new(pool.clone(), None);
            let products = PostgresProductRepo::new(pool, None);
            let ctx = crate::db::tests::RepoTestContext {
                customers: &customers,
                orders: &orders,
                products: &products,
            };
            super::$name(&ctx).await;
        }
    };
}

#[cfg(feature = "database-sqlite")]
pub(crate) use sqlite_test;
#[cfg(feature = "database-postgres")]
pub(crate) use postgres_test;
