mod customers;
mod orders;
mod products;

pub use customers::*;
pub use orders::*;
pub use products::*;
use validator::Validate;

use crate::db::error::{DbError, DbResult};

/// Run `validator` rules on a repository input before it reaches the database.
pub(crate) fn validate_input<T: Validate>(input: &T) -> DbResult<()> {
    input
        .validate()
        .map_err(|e| DbError::Validation(e.to_string()))
}
