//! Command errors.

use std::io;

use thiserror::Error;

use grocer::{
    cart::CartError,
    checkout::{CheckoutError, LocationError},
    coupons::CouponError,
    pricing::PricingError,
    products::ProductId,
    receipt::ReceiptError,
};
use grocer_app::{dispatch::DispatchError, last_order::LastOrderError, payments::PaymentWatchError};

use crate::shutdown::ShutdownSignalError;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    #[error("invalid price: {0}")]
    Price(#[from] PricingError),

    #[error("coupon refused: {0}")]
    Coupon(#[from] CouponError),

    #[error("cannot place order: {0}")]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    PaymentWatch(#[from] PaymentWatchError),

    #[error(transparent)]
    LastOrder(#[from] LastOrderError),

    #[error("failed to encode order draft: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Shutdown(#[from] ShutdownSignalError),
}
