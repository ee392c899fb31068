//! Payment status polling
//!
//! After the customer returns from the payment page the backend is asked to
//! verify the payment, then the order's payment status is polled at a fixed
//! interval until it settles. A paid order clears the cart.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
    time::Duration,
};

use rust_decimal::Decimal;
use thiserror::Error;
use tokio::{
    sync::oneshot,
    task::{JoinError, JoinHandle},
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, instrument, warn};

use crate::{
    gateway::{OrdersGateway, PaymentStatus},
    store::CartStore,
};

/// Default time between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Errors raised while waiting for a payment outcome.
#[derive(Debug, Error)]
pub enum PaymentWatchError {
    /// The polling task panicked or was aborted.
    #[error("payment polling task failed: {0}")]
    Join(#[from] JoinError),

    /// The outcome was already taken from this watch.
    #[error("payment outcome already taken")]
    Consumed,
}

/// Polling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Time between status checks
    pub interval: Duration,

    /// Give up after this many status checks; `None` polls until settled or cancelled
    pub max_attempts: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

/// How a watched payment finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment received; the cart has been cleared.
    Paid {
        /// Backend order id
        order_id: String,

        /// Order total, in major units
        total: Decimal,
    },

    /// Payment failed at the gateway.
    Failed {
        /// Backend order id
        order_id: String,
    },

    /// Status was still unpaid after the configured number of checks.
    TimedOut {
        /// Backend order id
        order_id: String,

        /// Status checks made
        attempts: u32,
    },

    /// Polling was cancelled.
    Cancelled,
}

/// Starts payment watches.
#[derive(Clone)]
pub struct PaymentStatusPoller {
    gateway: Arc<dyn OrdersGateway>,
    cart: CartStore,
    settings: PollSettings,
}

impl Debug for PaymentStatusPoller {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PaymentStatusPoller")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl PaymentStatusPoller {
    /// Create a poller.
    pub fn new(gateway: Arc<dyn OrdersGateway>, cart: CartStore, settings: PollSettings) -> Self {
        Self {
            gateway,
            cart,
            settings,
        }
    }

    /// Verify and poll `order_id` on a background task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn watch(&self, order_id: impl Into<String>) -> PaymentWatch {
        let (cancel, cancelled) = oneshot::channel();

        let task = tokio::spawn(poll(
            self.gateway.clone(),
            self.cart.clone(),
            order_id.into(),
            self.settings,
            cancelled,
        ));

        PaymentWatch {
            cancel: Some(cancel),
            task: Some(task),
        }
    }
}

/// Handle to a running payment watch. Dropping it stops polling.
#[derive(Debug)]
pub struct PaymentWatch {
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<PaymentOutcome>>,
}

impl PaymentWatch {
    /// Ask the polling task to stop; its outcome becomes [`PaymentOutcome::Cancelled`].
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            _ = cancel.send(());
        }
    }

    /// Whether the polling task has finished.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the payment to settle.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentWatchError`] if the task failed or the outcome was already taken.
    pub async fn outcome(&mut self) -> Result<PaymentOutcome, PaymentWatchError> {
        let Some(task) = self.task.as_mut() else {
            return Err(PaymentWatchError::Consumed);
        };

        let outcome = task.await?;

        self.task = None;

        Ok(outcome)
    }
}

impl Drop for PaymentWatch {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[instrument(skip(gateway, cart, settings, cancelled))]
async fn poll(
    gateway: Arc<dyn OrdersGateway>,
    cart: CartStore,
    order_id: String,
    settings: PollSettings,
    mut cancelled: oneshot::Receiver<()>,
) -> PaymentOutcome {
    tokio::select! {
        _ = &mut cancelled => return PaymentOutcome::Cancelled,
        result = gateway.verify_payment(&order_id) => {
            if let Err(error) = result {
                warn!(%error, "payment verification request failed");
            }
        }
    }

    let mut ticker = time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut attempts: u32 = 0;

    loop {
        tokio::select! {
            _ = &mut cancelled => {
                info!(attempts, "payment polling cancelled");

                return PaymentOutcome::Cancelled;
            }
            _ = ticker.tick() => {}
        }

        attempts = attempts.saturating_add(1);

        match gateway.payment_status(&order_id).await {
            Ok(report) => match report.status {
                PaymentStatus::Paid => {
                    cart.clear_cart();

                    info!(attempts, total = %report.total, "payment received");

                    return PaymentOutcome::Paid {
                        order_id,
                        total: report.total,
                    };
                }
                PaymentStatus::Failed => {
                    info!(attempts, "payment failed");

                    return PaymentOutcome::Failed { order_id };
                }
                PaymentStatus::Unpaid => debug!(attempts, "payment still pending"),
            },
            Err(error) => warn!(%error, attempts, "payment status check failed"),
        }

        if settings.max_attempts.is_some_and(|max| attempts >= max) {
            warn!(attempts, "payment still unpaid, giving up");

            return PaymentOutcome::TimedOut { order_id, attempts };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use testresult::TestResult;

    use crate::{
        gateway::{GatewayError, MockOrdersGateway, PaymentStatusReport},
        test::{product, stores},
    };

    use super::*;

    fn report(status: PaymentStatus) -> PaymentStatusReport {
        PaymentStatusReport {
            order_id: "66f1".to_string(),
            status,
            total: Decimal::from(900),
        }
    }

    fn settings(max_attempts: Option<u32>) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(3),
            max_attempts,
        }
    }

    /// Gateway that reports `unpaid` until the given call, then `final_status`.
    fn settling_gateway(settle_on: u32, final_status: PaymentStatus) -> MockOrdersGateway {
        let calls = Arc::new(AtomicU32::new(0));
        let mut gateway = MockOrdersGateway::new();

        gateway
            .expect_verify_payment()
            .once()
            .withf(|order_id| order_id == "66f1")
            .returning(|_| Ok(()));

        gateway.expect_payment_status().returning(move |_| {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;

            if call >= settle_on {
                Ok(report(final_status))
            } else {
                Ok(report(PaymentStatus::Unpaid))
            }
        });

        gateway
    }

    #[tokio::test(start_paused = true)]
    async fn paid_status_clears_cart() -> TestResult {
        let stores = stores();
        stores.cart.add_to_cart(&product("rice", 900))?;

        let poller = PaymentStatusPoller::new(
            Arc::new(settling_gateway(3, PaymentStatus::Paid)),
            stores.cart.clone(),
            settings(None),
        );

        let mut watch = poller.watch("66f1");

        assert!(!stores.cart.is_empty());

        let outcome = watch.outcome().await?;

        assert_eq!(
            outcome,
            PaymentOutcome::Paid {
                order_id: "66f1".to_string(),
                total: Decimal::from(900)
            }
        );
        assert!(stores.cart.is_empty());

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn failed_status_keeps_cart() -> TestResult {
        let stores = stores();
        stores.cart.add_to_cart(&product("rice", 900))?;

        let poller = PaymentStatusPoller::new(
            Arc::new(settling_gateway(2, PaymentStatus::Failed)),
            stores.cart.clone(),
            settings(None),
        );

        let outcome = poller.watch("66f1").outcome().await?;

        assert_eq!(
            outcome,
            PaymentOutcome::Failed {
                order_id: "66f1".to_string()
            }
        );
        assert_eq!(stores.cart.count(), 1);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() -> TestResult {
        let stores = stores();

        let poller = PaymentStatusPoller::new(
            Arc::new(settling_gateway(u32::MAX, PaymentStatus::Paid)),
            stores.cart.clone(),
            settings(Some(4)),
        );

        let outcome = poller.watch("66f1").outcome().await?;

        assert_eq!(
            outcome,
            PaymentOutcome::TimedOut {
                order_id: "66f1".to_string(),
                attempts: 4
            }
        );

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn status_errors_and_failed_verification_do_not_stop_polling() -> TestResult {
        let stores = stores();
        let calls = Arc::new(AtomicU32::new(0));
        let mut gateway = MockOrdersGateway::new();

        gateway
            .expect_verify_payment()
            .returning(|_| Err(GatewayError::UnexpectedResponse("502".to_string())));

        gateway.expect_payment_status().returning(move |_| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(GatewayError::UnexpectedResponse("503".to_string()))
            } else {
                Ok(report(PaymentStatus::Paid))
            }
        });

        let poller =
            PaymentStatusPoller::new(Arc::new(gateway), stores.cart.clone(), settings(None));

        let outcome = poller.watch("66f1").outcome().await?;

        assert!(matches!(outcome, PaymentOutcome::Paid { .. }));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_polling() -> TestResult {
        let stores = stores();
        stores.cart.add_to_cart(&product("rice", 900))?;

        let poller = PaymentStatusPoller::new(
            Arc::new(settling_gateway(u32::MAX, PaymentStatus::Paid)),
            stores.cart.clone(),
            settings(None),
        );

        let mut watch = poller.watch("66f1");

        time::sleep(Duration::from_secs(10)).await;
        watch.cancel();

        assert_eq!(watch.outcome().await?, PaymentOutcome::Cancelled);
        assert!(watch.is_finished());
        assert!(matches!(
            watch.outcome().await,
            Err(PaymentWatchError::Consumed)
        ));
        assert_eq!(stores.cart.count(), 1);

        Ok(())
    }
}
