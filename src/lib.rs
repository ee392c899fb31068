//! Grocer
//!
//! Grocer is the cart and checkout pricing engine behind a grocery storefront:
//! cart line bookkeeping, coupon evaluation, checkout totals and the order
//! draft handed to the order and payment backend.

pub mod cart;
pub mod checkout;
pub mod coupons;
pub mod discounts;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;

#[cfg(test)]
mod test_support;
