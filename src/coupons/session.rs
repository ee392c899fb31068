//! Coupon Session
//!
//! Tracks the coupon for a single checkout session.
//!
//! ```text
//! NoCoupon --begin--> Applying --resolve--> Applied | Rejected
//! Applied  --remove--> NoCoupon
//! Rejected --begin--> Applying
//! ```
//!
//! A rejected attempt never discards a coupon that was already applied; only
//! [`CouponSession::remove`] does. A successful attempt replaces the applied
//! coupon outright.

use rusty_money::{Money, iso::Currency};

use crate::{
    coupons::{Coupon, CouponError, CouponTable},
    discounts::DiscountError,
    pricing::zero,
};

/// Observable state of the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CouponState<'a> {
    /// Nothing applied and no attempt outstanding.
    NoCoupon,

    /// A code has been entered and is being evaluated.
    Applying(&'a str),

    /// The most recent attempt succeeded.
    Applied(&'a Coupon),

    /// The most recent attempt was refused.
    Rejected(&'a CouponError),
}

/// Per-checkout coupon state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponSession {
    applied: Option<Coupon>,
    pending: Option<String>,
    rejection: Option<CouponError>,
}

impl CouponSession {
    /// Start a session with no coupon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a code is being evaluated.
    pub fn begin(&mut self, code: &str) {
        self.pending = Some(code.to_string());
        self.rejection = None;
    }

    /// Evaluate the pending code against the table and subtotal.
    ///
    /// # Errors
    ///
    /// Returns the [`CouponError`] the table produced. With no pending code,
    /// an empty code is evaluated and refused as invalid.
    pub fn resolve(
        &mut self,
        table: &CouponTable,
        subtotal: &Money<'static, Currency>,
    ) -> Result<&Coupon, CouponError> {
        let code = self.pending.take().unwrap_or_default();

        match table.apply(&code, subtotal) {
            Ok(coupon) => {
                self.rejection = None;

                Ok(self.applied.insert(coupon))
            }
            Err(error) => {
                self.rejection = Some(error.clone());

                Err(error)
            }
        }
    }

    /// Evaluate a code in one step.
    ///
    /// # Errors
    ///
    /// Returns the [`CouponError`] the table produced.
    pub fn apply(
        &mut self,
        table: &CouponTable,
        code: &str,
        subtotal: &Money<'static, Currency>,
    ) -> Result<&Coupon, CouponError> {
        self.begin(code);
        self.resolve(table, subtotal)
    }

    /// Drop the applied coupon and any outstanding rejection.
    pub fn remove(&mut self) {
        self.applied = None;
        self.pending = None;
        self.rejection = None;
    }

    /// Currently applied coupon.
    pub fn applied(&self) -> Option<&Coupon> {
        self.applied.as_ref()
    }

    /// Code of the applied coupon.
    pub fn applied_code(&self) -> Option<&str> {
        self.applied.as_ref().map(Coupon::code)
    }

    /// Error from the latest attempt, if it was refused.
    pub fn rejection(&self) -> Option<&CouponError> {
        self.rejection.as_ref()
    }

    /// Discount for the applied coupon on `subtotal`, zero with no coupon.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if a percentage discount cannot be represented.
    pub fn discount_on(
        &self,
        subtotal: &Money<'static, Currency>,
    ) -> Result<Money<'static, Currency>, DiscountError> {
        match &self.applied {
            Some(coupon) => coupon.discount_on(subtotal),
            None => Ok(zero(subtotal.currency())),
        }
    }

    /// Current state.
    pub fn state(&self) -> CouponState<'_> {
        if let Some(code) = &self.pending {
            return CouponState::Applying(code);
        }

        if let Some(error) = &self.rejection {
            return CouponState::Rejected(error);
        }

        match &self.applied {
            Some(coupon) => CouponState::Applied(coupon),
            None => CouponState::NoCoupon,
        }
    }
}
