//! Coupon Table
//!
//! Static lookup table of coupon rules. The built-in table mirrors the
//! storefront's published codes; a YAML document can replace it.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Findable, Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    coupons::{Coupon, CouponError, CouponKind, normalize_code},
    discounts::percentage_from_points,
    pricing::{PricingError, from_major},
};

/// Errors raised while loading a coupon table.
#[derive(Debug, Error)]
pub enum CouponTableError {
    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Percentage outside 0..=100
    #[error("Coupon {0} has invalid percentage {1}")]
    InvalidPercentage(String, Decimal),

    /// Amount could not be converted to money
    #[error("Coupon {0} has an invalid amount: {1}")]
    InvalidAmount(String, #[source] PricingError),

    /// Code is empty after normalization
    #[error("Coupon codes must not be empty")]
    EmptyCode,
}

/// Coupon rules keyed by normalized code.
#[derive(Debug, Clone)]
pub struct CouponTable {
    rules: FxHashMap<String, Coupon>,
    currency: &'static Currency,
}

impl CouponTable {
    /// Create a table from rules. Later rules with the same code replace earlier ones.
    pub fn new(currency: &'static Currency, rules: impl IntoIterator<Item = Coupon>) -> Self {
        let rules = rules
            .into_iter()
            .map(|coupon| (coupon.code().to_string(), coupon))
            .collect();

        Self { rules, currency }
    }

    /// The storefront's built-in codes: `SAVE10` (10% off, minimum 500) and
    /// `FLAT100` (100 off, minimum 800).
    pub fn builtin(currency: &'static Currency) -> Self {
        let major = |amount: i64| {
            Money::from_minor(
                amount.saturating_mul(10_i64.saturating_pow(currency.exponent)),
                currency,
            )
        };

        Self::new(
            currency,
            [
                Coupon::new(
                    "SAVE10",
                    CouponKind::Percentage(percentage_from_points(Decimal::TEN)),
                    major(500),
                ),
                Coupon::new("FLAT100", CouponKind::Fixed(major(100)), major(800)),
            ],
        )
    }

    /// Load a table from YAML.
    ///
    /// ```yaml
    /// currency: BDT
    /// coupons:
    ///   SAVE10:
    ///     type: percentage
    ///     value: 10
    ///     min_order: 500
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`CouponTableError`] if the document is malformed or a rule is invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self, CouponTableError> {
        let fixture: CouponTableFixture = serde_norway::from_str(yaml)?;

        let Some(currency) = Currency::find(&fixture.currency) else {
            return Err(CouponTableError::UnknownCurrency(fixture.currency));
        };

        let rules = fixture
            .coupons
            .into_iter()
            .map(|(code, rule)| rule.try_into_coupon(&code, currency))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(currency, rules))
    }

    /// Look up the rule for a code (normalized before lookup).
    pub fn get(&self, code: &str) -> Option<&Coupon> {
        self.rules.get(&normalize_code(code))
    }

    /// Validate a code against a subtotal.
    ///
    /// # Errors
    ///
    /// - [`CouponError::InvalidCouponCode`]: no rule exists for the code.
    /// - [`CouponError::MinimumOrderNotMet`]: the subtotal is below the rule's minimum.
    pub fn apply(
        &self,
        code: &str,
        subtotal: &Money<'static, Currency>,
    ) -> Result<Coupon, CouponError> {
        let code = normalize_code(code);

        let Some(coupon) = self.rules.get(&code) else {
            return Err(CouponError::InvalidCouponCode(code));
        };

        if !coupon.is_eligible(subtotal) {
            return Err(CouponError::MinimumOrderNotMet(*coupon.min_order()));
        }

        Ok(coupon.clone())
    }

    /// Currency the rule amounts are expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct CouponTableFixture {
    currency: String,
    coupons: FxHashMap<String, CouponFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum CouponFixture {
    Percentage { value: Decimal, min_order: Decimal },
    Fixed { value: Decimal, min_order: Decimal },
}

impl CouponFixture {
    fn try_into_coupon(
        self,
        code: &str,
        currency: &'static Currency,
    ) -> Result<Coupon, CouponTableError> {
        if normalize_code(code).is_empty() {
            return Err(CouponTableError::EmptyCode);
        }

        let amount = |value: Decimal| {
            from_major(value, currency)
                .map_err(|source| CouponTableError::InvalidAmount(code.to_string(), source))
        };

        match self {
            CouponFixture::Percentage { value, min_order } => {
                if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                    return Err(CouponTableError::InvalidPercentage(code.to_string(), value));
                }

                Ok(Coupon::new(
                    code,
                    CouponKind::Percentage(percentage_from_points(value)),
                    amount(min_order)?,
                ))
            }
            CouponFixture::Fixed { value, min_order } => Ok(Coupon::new(
                code,
                CouponKind::Fixed(amount(value)?),
                amount(min_order)?,
            )),
        }
    }
}
