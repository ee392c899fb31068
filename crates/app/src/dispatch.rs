//! Order Submission Dispatcher
//!
//! Routes a checkout draft to order creation (cash on delivery) or payment
//! initiation (online payment). Only one submission may be in flight at a time.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use jiff::Timestamp;
use thiserror::Error;
use tracing::{info, instrument, warn};

use grocer::orders::{CheckoutOrderDraft, PaymentMethod};

use crate::{
    gateway::{GatewayError, OrdersGateway},
    last_order::{LastOrder, LastOrderStore},
    store::CartStore,
};

/// Errors raised while submitting an order.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Another submission has not finished yet.
    #[error("an order submission is already in progress")]
    AlreadySubmitting,

    /// The backend call failed; the cart is untouched.
    #[error("order submission failed: {0}")]
    OrderSubmissionFailed(#[source] GatewayError),

    /// Payment initiation succeeded without a payment URL.
    #[error("payment initiation returned no payment URL")]
    PaymentRedirectMissing,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Cash-on-delivery order placed; the cart has been cleared.
    Placed(LastOrder),

    /// Online payment started; send the customer to `payment_url`.
    Redirect {
        /// Payment page address
        payment_url: String,

        /// Order awaiting payment, when the backend reports it
        order_id: Option<String>,
    },
}

/// Sends checkout drafts to the backend.
#[derive(Clone)]
pub struct OrderDispatcher {
    gateway: Arc<dyn OrdersGateway>,
    cart: CartStore,
    last_order: LastOrderStore,
    submitting: Arc<AtomicBool>,
}

impl Debug for OrderDispatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OrderDispatcher")
            .field("cart", &self.cart)
            .field("submitting", &self.is_submitting())
            .finish_non_exhaustive()
    }
}

impl OrderDispatcher {
    /// Create a dispatcher.
    pub fn new(
        gateway: Arc<dyn OrdersGateway>,
        cart: CartStore,
        last_order: LastOrderStore,
    ) -> Self {
        Self {
            gateway,
            cart,
            last_order,
            submitting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Submit a draft according to its payment method.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::AlreadySubmitting`]: another submission is in flight.
    /// - [`DispatchError::OrderSubmissionFailed`]: the backend call failed or was refused.
    /// - [`DispatchError::PaymentRedirectMissing`]: online payment started without a URL.
    #[instrument(
        skip_all,
        fields(payment_method = %draft.payment_method, items = draft.items.len())
    )]
    pub async fn submit(
        &self,
        draft: &CheckoutOrderDraft,
    ) -> Result<SubmissionOutcome, DispatchError> {
        let _guard =
            SubmissionGuard::acquire(&self.submitting).ok_or(DispatchError::AlreadySubmitting)?;

        match draft.payment_method {
            PaymentMethod::CashOnDelivery => self.place_order(draft).await,
            PaymentMethod::ShurjoPay => self.start_payment(draft).await,
        }
    }

    async fn place_order(
        &self,
        draft: &CheckoutOrderDraft,
    ) -> Result<SubmissionOutcome, DispatchError> {
        let receipt = self
            .gateway
            .create_order(draft)
            .await
            .map_err(DispatchError::OrderSubmissionFailed)?;

        self.cart.clear_cart();

        let order = LastOrder::from_receipt(&receipt, draft, Timestamp::now());

        if let Err(error) = self.last_order.put(&order) {
            warn!(%error, order_id = %order.order_id, "failed to record last order");
        }

        info!(order_id = %order.order_id, total = %order.total, "order placed");

        Ok(SubmissionOutcome::Placed(order))
    }

    async fn start_payment(
        &self,
        draft: &CheckoutOrderDraft,
    ) -> Result<SubmissionOutcome, DispatchError> {
        let initiation = self
            .gateway
            .initiate_payment(draft)
            .await
            .map_err(DispatchError::OrderSubmissionFailed)?;

        if !initiation.success {
            let message = initiation
                .message
                .unwrap_or_else(|| "payment was not initiated".to_string());

            return Err(DispatchError::OrderSubmissionFailed(GatewayError::Rejected(
                message,
            )));
        }

        let Some(payment_url) = initiation.payment_url.filter(|url| !url.trim().is_empty())
        else {
            return Err(DispatchError::PaymentRedirectMissing);
        };

        info!(%payment_url, order_id = ?initiation.order_id, "payment initiated");

        Ok(SubmissionOutcome::Redirect {
            payment_url,
            order_id: initiation.order_id,
        })
    }
}

/// Holds the in-flight flag until dropped, including when the submission future is cancelled.
struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmissionGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
