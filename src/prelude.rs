//! Grocer prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, CartLineRecord, RecordError},
    checkout::{
        Checkout, CheckoutError, CheckoutForm, CheckoutTotals, Customer, LocationError, Locations,
        MissingFields, RequiredField, ShippingAddress,
    },
    coupons::{
        Coupon, CouponError, CouponKind, CouponSession, CouponState, CouponTable, CouponTableError,
    },
    discounts::DiscountError,
    orders::{CheckoutOrderDraft, OrderItem, PaymentMethod},
    pricing::PricingError,
    products::{Product, ProductId},
    receipt::{Receipt, ReceiptError},
};
