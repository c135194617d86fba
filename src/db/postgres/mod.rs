mod customers;
mod orders;
mod products;

pub use customers::PostgresCustomerRepo;
pub use orders::PostgresOrderRepo;
pub use products::PostgresProductRepo;
