mod customer;
pub mod money;
mod order;
mod product;
mod validators;

pub use customer::*;
pub use order::*;
pub use product::*;
