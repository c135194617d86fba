use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

/// Phone numbers accepted for customers.
/// Examples: "+1234567890", "123-456-7890"
pub static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+?\d{7,15}|\d{3}-\d{3}-\d{4})$").unwrap());

/// Validate that a monetary amount is at least 0.01 and has no more than
/// two decimal places.
pub fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount < Decimal::new(1, 2) {
        let mut err = ValidationError::new("amount_too_small");
        err.message = Some(Cow::Borrowed("Amount must be at least 0.01"));
        return Err(err);
    }
    if amount.normalize().scale() > 2 {
        let mut err = ValidationError::new("amount_precision");
        err.message = Some(Cow::Borrowed(
            "Amount cannot have more than two decimal places",
        ));
        return Err(err);
    }
    Ok(())
}
