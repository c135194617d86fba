mod common;
mod customers;
mod orders;
mod products;

pub use customers::SqliteCustomerRepo;
pub use orders::SqliteOrderRepo;
pub use products::SqliteProductRepo;
