//! Discounts
//!
//! Shared arithmetic for turning coupon rules into concrete discount amounts.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows or cannot be
/// represented in minor units.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Calculate a percentage discount on an amount of money.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the result cannot be represented.
pub fn percent_of(
    percent: &Percentage,
    amount: &Money<'static, Currency>,
) -> Result<Money<'static, Currency>, DiscountError> {
    let discount_minor = percent_of_minor(percent, amount.to_minor_units())?;

    Ok(Money::from_minor(discount_minor, amount.currency()))
}

/// Builds a fractional percentage from percent points (`10` becomes 10%).
pub fn percentage_from_points(points: Decimal) -> Percentage {
    Percentage::from(points / Decimal::ONE_HUNDRED)
}
