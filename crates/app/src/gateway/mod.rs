//! Order and payment collaborators.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use grocer::orders::CheckoutOrderDraft;

mod errors;
mod http;

pub use errors::GatewayError;
pub use http::{GatewayConfig, HttpOrdersGateway};

/// Order accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    /// Backend order id
    pub order_id: String,

    /// Amount the backend recorded, in major units
    pub total: Decimal,
}

/// Answer to a payment initiation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiation {
    /// Whether the backend accepted the request
    pub success: bool,

    /// Where to send the customer to pay
    #[serde(default)]
    pub payment_url: Option<String>,

    /// Backend message, usually present on failure
    #[serde(default)]
    pub message: Option<String>,

    /// Order created for the payment, when the backend reports it
    #[serde(default, alias = "_id")]
    pub order_id: Option<String>,
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting payment
    Unpaid,

    /// Payment received
    Paid,

    /// Payment failed or was cancelled at the gateway
    Failed,
}

/// Payment status of one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentStatusReport {
    /// Backend order id
    pub order_id: String,

    /// Current payment state
    pub status: PaymentStatus,

    /// Order total, in major units
    pub total: Decimal,
}

/// The order creation and payment endpoints.
#[automock]
#[async_trait]
pub trait OrdersGateway: Send + Sync {
    /// Create a cash-on-delivery order.
    async fn create_order(&self, draft: &CheckoutOrderDraft)
    -> Result<OrderReceipt, GatewayError>;

    /// Start an online payment for the draft.
    async fn initiate_payment(
        &self,
        draft: &CheckoutOrderDraft,
    ) -> Result<PaymentInitiation, GatewayError>;

    /// Ask the backend to confirm a payment with the payment provider.
    async fn verify_payment(&self, order_id: &str) -> Result<(), GatewayError>;

    /// Fetch the payment status of an order.
    async fn payment_status(&self, order_id: &str) -> Result<PaymentStatusReport, GatewayError>;
}
