//! Pricing

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use serde::Serializer;
use thiserror::Error;

/// Errors raised when converting between major-unit amounts and money.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The amount does not fit in the currency's minor units.
    #[error("amount {0} cannot be represented in {1} minor units")]
    Unrepresentable(Decimal, &'static str),

    /// The amount is negative where only non-negative amounts are allowed.
    #[error("amount {0} must not be negative")]
    Negative(Decimal),
}

/// Zero in the given currency.
pub fn zero(currency: &'static Currency) -> Money<'static, Currency> {
    Money::from_minor(0, currency)
}

/// Multiplies a unit price by a quantity, saturating at the representable maximum.
pub fn line_total(price: &Money<'static, Currency>, qty: u32) -> Money<'static, Currency> {
    let minor = price.to_minor_units().saturating_mul(i64::from(qty));

    Money::from_minor(minor, price.currency())
}

/// Sums amounts in minor units, saturating instead of overflowing.
pub fn sum_minor(amounts: impl IntoIterator<Item = i64>) -> i64 {
    amounts.into_iter().fold(0, i64::saturating_add)
}

/// Subtracts `amount` from `total`, never going below zero.
pub fn floor_at_zero_sub(
    total: &Money<'static, Currency>,
    amount: &Money<'static, Currency>,
) -> Money<'static, Currency> {
    let remaining = total
        .to_minor_units()
        .saturating_sub(amount.to_minor_units())
        .max(0);

    Money::from_minor(remaining, total.currency())
}

/// Express money in major units (e.g. taka rather than poisha).
pub fn to_major(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), money.currency().exponent)
}

/// Build money from a major-unit amount, rounding half away from zero to minor units.
///
/// # Errors
///
/// - [`PricingError::Negative`]: the amount is below zero.
/// - [`PricingError::Unrepresentable`]: the amount overflows the minor-unit range.
pub fn from_major(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PricingError::Negative(amount));
    }

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .and_then(Decimal::from_i64)
        .ok_or(PricingError::Unrepresentable(amount, currency.iso_alpha_code))?;

    let minor = amount
        .round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(scale)
        .and_then(|scaled| scaled.to_i64())
        .ok_or(PricingError::Unrepresentable(amount, currency.iso_alpha_code))?;

    Ok(Money::from_minor(minor, currency))
}

/// Serialize money as a JSON number in major units.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize_major<S>(money: &Money<'_, Currency>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    rust_decimal::serde::float::serialize(&to_major(money), serializer)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::BDT;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn line_total_multiplies_by_quantity() {
        let price = Money::from_minor(125_50, BDT);

        assert_eq!(line_total(&price, 3), Money::from_minor(376_50, BDT));
    }

    #[test]
    fn line_total_saturates() {
        let price = Money::from_minor(i64::MAX, BDT);

        assert_eq!(line_total(&price, 2).to_minor_units(), i64::MAX);
    }

    #[test]
    fn floor_at_zero_sub_never_goes_negative() {
        let total = Money::from_minor(50_00, BDT);
        let discount = Money::from_minor(100_00, BDT);

        assert_eq!(floor_at_zero_sub(&total, &discount), zero(BDT));
    }

    #[test]
    fn to_major_uses_currency_exponent() {
        let money = Money::from_minor(900_50, BDT);

        assert_eq!(to_major(&money), Decimal::new(90050, 2));
    }

    #[test]
    fn from_major_rounds_half_away_from_zero() -> TestResult {
        let money = from_major(Decimal::new(10_005, 3), BDT)?;

        assert_eq!(money.to_minor_units(), 10_01);

        Ok(())
    }

    #[test]
    fn from_major_rejects_negative_amounts() {
        let result = from_major(Decimal::new(-1, 0), BDT);

        assert!(matches!(result, Err(PricingError::Negative(_))));
    }

    #[test]
    fn from_major_rejects_overflow() {
        let result = from_major(Decimal::MAX, BDT);

        assert!(matches!(result, Err(PricingError::Unrepresentable(_, "BDT"))));
    }
}
