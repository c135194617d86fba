//! Conversions between decimal amounts and the integer cents stored in the database.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

/// Convert a decimal amount to whole cents, rounding half away from zero.
///
/// Returns `None` if the amount does not fit in an `i64`.
pub fn to_cents(amount: Decimal) -> Option<i64> {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
}

/// Convert whole cents back to a decimal amount with two decimal places.
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
