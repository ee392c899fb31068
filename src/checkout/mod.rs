//! Checkout
//!
//! Combines the cart, the coupon session, the customer's form and the chosen
//! payment method into payable totals and, once everything required is
//! present, a [`CheckoutOrderDraft`].

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::Cart,
    coupons::{Coupon, CouponError, CouponSession, CouponTable},
    discounts::DiscountError,
    orders::{CheckoutOrderDraft, PaymentMethod},
    pricing::floor_at_zero_sub,
};

pub mod form;
pub mod locations;

pub use form::{CheckoutForm, Customer, MissingFields, RequiredField, ShippingAddress};
pub use locations::{LocationError, Locations};

/// Errors that block building an order draft.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Required fields are empty.
    #[error("missing required fields: {}", join_fields(.0))]
    ValidationIncomplete(MissingFields),

    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The coupon discount could not be computed.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

fn join_fields(fields: &MissingFields) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Payable amounts for the current cart and coupon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutTotals {
    /// Cart total before discount
    pub subtotal: Money<'static, Currency>,

    /// Coupon discount, zero without a coupon
    pub discount: Money<'static, Currency>,

    /// Amount payable, never below zero
    pub total: Money<'static, Currency>,
}

/// Checkout state for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    /// Customer and address form
    pub form: CheckoutForm,

    coupon: CouponSession,
    payment_method: PaymentMethod,
}

impl Default for Checkout {
    fn default() -> Self {
        Self::new()
    }
}

impl Checkout {
    /// Start a checkout with an empty form, no coupon and cash on delivery.
    pub fn new() -> Self {
        Self {
            form: CheckoutForm::default(),
            coupon: CouponSession::new(),
            payment_method: PaymentMethod::CashOnDelivery,
        }
    }

    /// Start a checkout from a filled-in form.
    pub fn with_form(form: CheckoutForm) -> Self {
        Self {
            form,
            ..Self::new()
        }
    }

    /// Apply a coupon code against the cart's current total.
    ///
    /// # Errors
    ///
    /// Returns the [`CouponError`] the table produced; a previously applied coupon stays in place.
    pub fn apply_coupon(
        &mut self,
        table: &CouponTable,
        code: &str,
        cart: &Cart,
    ) -> Result<&Coupon, CouponError> {
        self.coupon.apply(table, code, &cart.total())
    }

    /// Remove the applied coupon.
    pub fn remove_coupon(&mut self) {
        self.coupon.remove();
    }

    /// Coupon session.
    pub fn coupon(&self) -> &CouponSession {
        &self.coupon
    }

    /// Coupon session, mutably, for front ends driving the apply steps themselves.
    pub fn coupon_mut(&mut self) -> &mut CouponSession {
        &mut self.coupon
    }

    /// Choose how the order is paid.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Chosen payment method.
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Compute subtotal, discount and payable total, recomputed from the cart on every call.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Discount`] if the coupon discount cannot be represented.
    pub fn totals(&self, cart: &Cart) -> Result<CheckoutTotals, CheckoutError> {
        let subtotal = cart.total();
        let discount = self.coupon.discount_on(&subtotal)?;
        let total = floor_at_zero_sub(&subtotal, &discount);

        Ok(CheckoutTotals {
            subtotal,
            discount,
            total,
        })
    }

    /// Check the cart and form are ready for submission.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the cart has no lines.
    /// - [`CheckoutError::ValidationIncomplete`]: required fields are empty.
    pub fn validate(&self, cart: &Cart) -> Result<(), CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let missing = self.form.missing_fields();

        if !missing.is_empty() {
            return Err(CheckoutError::ValidationIncomplete(missing));
        }

        Ok(())
    }

    /// Whether submission should be enabled.
    pub fn can_submit(&self, cart: &Cart) -> bool {
        self.validate(cart).is_ok()
    }

    /// Assemble the order draft.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if validation fails or the discount cannot be computed.
    pub fn draft(&self, cart: &Cart) -> Result<CheckoutOrderDraft, CheckoutError> {
        self.validate(cart)?;

        let totals = self.totals(cart)?;
        let CheckoutForm { customer, address } = self.form.trimmed();

        Ok(CheckoutOrderDraft {
            items: cart.order_items(),
            customer,
            shipping_address: address,
            total: totals.total,
            payment_method: self.payment_method,
            coupon: self.coupon.applied_code().map(str::to_string),
            discount: totals.discount,
        })
    }
}
