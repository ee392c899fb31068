//! Coupons
//!
//! Coupon rules, code normalization and discount computation.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::discounts::{DiscountError, percent_of};

pub mod session;
pub mod table;

pub use session::{CouponSession, CouponState};
pub use table::{CouponTable, CouponTableError};

/// Reasons a coupon code is refused.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CouponError {
    /// No rule exists for the (normalized) code.
    #[error("invalid coupon code {0}")]
    InvalidCouponCode(String),

    /// The rule exists but the subtotal is below its minimum order amount.
    #[error("minimum order of {0} not met")]
    MinimumOrderNotMet(Money<'static, Currency>),
}

/// What a coupon takes off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CouponKind {
    /// A percentage of the subtotal (e.g. "10% off")
    Percentage(Percentage),

    /// A flat amount (e.g. "৳100 off")
    Fixed(Money<'static, Currency>),
}

/// A coupon rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    code: String,
    kind: CouponKind,
    min_order: Money<'static, Currency>,
}

impl Coupon {
    /// Create a rule. The code is normalized.
    pub fn new(code: &str, kind: CouponKind, min_order: Money<'static, Currency>) -> Self {
        Self {
            code: normalize_code(code),
            kind,
            min_order,
        }
    }

    /// Normalized code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Rule kind.
    pub fn kind(&self) -> &CouponKind {
        &self.kind
    }

    /// Minimum subtotal for the coupon to apply.
    pub fn min_order(&self) -> &Money<'static, Currency> {
        &self.min_order
    }

    /// Whether the subtotal reaches the minimum order amount.
    pub fn is_eligible(&self, subtotal: &Money<'static, Currency>) -> bool {
        subtotal.to_minor_units() >= self.min_order.to_minor_units()
    }

    /// Discount this coupon grants on a subtotal.
    ///
    /// Percentage rules take their share of the subtotal, rounded to minor units.
    /// Fixed rules take their full value; callers floor the resulting total at zero.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if a percentage discount cannot be represented.
    pub fn discount_on(
        &self,
        subtotal: &Money<'static, Currency>,
    ) -> Result<Money<'static, Currency>, DiscountError> {
        match &self.kind {
            CouponKind::Percentage(percent) => percent_of(percent, subtotal),
            CouponKind::Fixed(amount) => Ok(Money::from_minor(
                amount.to_minor_units(),
                subtotal.currency(),
            )),
        }
    }
}

/// Trim and uppercase a user-entered code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
