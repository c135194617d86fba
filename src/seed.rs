//! Demo data set for local development.

use rust_decimal::dec;

use crate::{
    db::{DbError, DbPool},
    models::{CreateCustomer, CreateOrder, CreateProduct, OrderItem},
};

/// Seeding errors.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error(
        "Database already holds {customers} customers and {products} products; rerun with --reset to replace them"
    )]
    NotEmpty { customers: i64, products: i64 },
}

/// What a seed run created.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
}

/// Populate the demo customers, products and orders.
///
/// With `reset` every existing customer (with their orders) and product is
/// deleted first. Without it, a store that already has data is left alone.
pub async fn seed_database(db: &DbPool, reset: bool) -> Result<SeedSummary, SeedError> {
    let customers = db.customers();
    let products = db.products();
    let orders = db.orders();

    if reset {
        let removed_customers = customers.delete_all().await?;
        let removed_products = products.delete_all().await?;
        tracing::info!(
            customers = removed_customers,
            products = removed_products,
            "Cleared existing data"
        );
    } else {
        let existing_customers = customers.count().await?;
        let existing_products = products.count().await?;
        if existing_customers > 0 || existing_products > 0 {
            return Err(SeedError::NotEmpty {
                customers: existing_customers,
                products: existing_products,
            });
        }
    }

    let mut summary = SeedSummary::default();

    let mut customer_ids = Vec::new();
    for (name, email, phone) in [
        ("Alice Johnson", "alice@example.com", "+1234567890"),
        ("Bob Smith", "bob@example.com", "123-456-7890"),
        ("Carol Davis", "carol@example.com", "+0987654321"),
    ] {
        let customer = customers
            .create(CreateCustomer {
                name: name.to_string(),
                email: email.to_string(),
                phone: Some(phone.to_string()),
            })
            .await?;
        customer_ids.push(customer.id);
        summary.customers += 1;
    }

    let mut catalog = Vec::new();
    for (name, price, stock) in [
        ("Laptop", dec!(999.99), 10),
        ("Mouse", dec!(29.99), 50),
        ("Keyboard", dec!(79.99), 30),
        ("Monitor", dec!(299.99), 15),
    ] {
        let product = products
            .create(CreateProduct {
                name: name.to_string(),
                price,
                stock,
            })
            .await?;
        catalog.push(product);
        summary.products += 1;
    }

    let (laptop, mouse, keyboard) = (&catalog[0], &catalog[1], &catalog[2]);
    let line = |product_id| OrderItem {
        product_id,
        quantity: 1,
    };

    for (customer_id, items) in [
        (customer_ids[0], vec![laptop, mouse]),
        (customer_ids[1], vec![keyboard]),
    ] {
        orders
            .create(CreateOrder {
                customer_id,
                total_amount: items.iter().map(|p| p.price).sum(),
                items: items.iter().map(|p| line(p.id)).collect(),
                placed_at: None,
            })
            .await?;
        summary.orders += 1;
    }

    tracing::info!(
        customers = summary.customers,
        products = summary.products,
        orders = summary.orders,
        "Database seeded"
    );

    Ok(summary)
}
