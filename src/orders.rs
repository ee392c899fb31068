//! Orders
//!
//! The order submission payload shared by cash-on-delivery order creation and
//! online payment initiation.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::CartLine,
    checkout::form::{Customer, ShippingAddress},
    pricing::serialize_major,
    products::ProductId,
};

/// How the customer pays for the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash on delivery
    #[serde(rename = "COD")]
    CashOnDelivery,

    /// Online payment through the ShurjoPay gateway
    #[serde(rename = "ShurjoPay")]
    ShurjoPay,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PaymentMethod::CashOnDelivery => f.write_str("COD"),
            PaymentMethod::ShurjoPay => f.write_str("ShurjoPay"),
        }
    }
}

/// Error returned when a payment method name is not recognised.
#[derive(Debug, Error, PartialEq)]
#[error("unknown payment method {0:?}; expected COD or ShurjoPay")]
pub struct ParsePaymentMethodError(String);

impl FromStr for PaymentMethod {
    type Err = ParsePaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cod" | "cash" | "cash-on-delivery" => Ok(PaymentMethod::CashOnDelivery),
            "shurjopay" | "online" => Ok(PaymentMethod::ShurjoPay),
            _ => Err(ParsePaymentMethodError(s.to_string())),
        }
    }
}

/// A cart line reshaped for the order collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product reference
    pub product: ProductId,

    /// Product title
    pub title: String,

    /// Unit price, snapshotted when the product was added to the cart
    #[serde(serialize_with = "serialize_major")]
    pub price: Money<'static, Currency>,

    /// Quantity ordered
    pub quantity: u32,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product: line.product_id().clone(),
            title: line.name().to_string(),
            price: *line.price(),
            quantity: line.qty(),
        }
    }
}

/// Order submission payload assembled at checkout.
///
/// Built fresh for every submission attempt and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOrderDraft {
    /// Items being ordered
    pub items: Vec<OrderItem>,

    /// Who is ordering
    pub customer: Customer,

    /// Where to deliver
    pub shipping_address: ShippingAddress,

    /// Amount payable after discount
    #[serde(serialize_with = "serialize_major")]
    pub total: Money<'static, Currency>,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Applied coupon code, if any
    pub coupon: Option<String>,

    /// Discount granted by the coupon
    #[serde(serialize_with = "serialize_major")]
    pub discount: Money<'static, Currency>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_parses_case_insensitively() {
        assert_eq!("cod".parse(), Ok(PaymentMethod::CashOnDelivery));
        assert_eq!("ShurjoPay".parse(), Ok(PaymentMethod::ShurjoPay));
        assert_eq!(
            "bkash".parse::<PaymentMethod>(),
            Err(ParsePaymentMethodError("bkash".to_string()))
        );
    }

    #[test]
    fn payment_method_serializes_to_backend_names() -> Result<(), serde_json::Error> {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery)?,
            "\"COD\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::ShurjoPay)?,
            "\"ShurjoPay\""
        );

        Ok(())
    }
}
