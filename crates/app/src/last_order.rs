//! Last Order
//!
//! Confirmation record of the most recently placed order. It is written when
//! an order is placed and deleted the first time it is read, so a confirmation
//! is shown once.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use grocer::{
    checkout::{Customer, ShippingAddress},
    orders::{CheckoutOrderDraft, PaymentMethod},
};

use crate::{
    gateway::OrderReceipt,
    storage::{KeyValueStorage, StorageError},
};

/// Storage key of the last order.
pub const LAST_ORDER_KEY: &str = "lastOrder";

/// Errors raised while storing or reading the last order.
#[derive(Debug, Error)]
pub enum LastOrderError {
    /// Storage backend failure
    #[error("last order storage failed: {0}")]
    Storage(#[from] StorageError),

    /// Stored payload could not be encoded or decoded
    #[error("last order payload is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Confirmation details of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastOrder {
    /// Order id assigned by the backend
    pub order_id: String,

    /// Amount payable, in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// ISO currency code of `total`
    pub currency: String,

    /// How the order is paid
    pub payment_method: PaymentMethod,

    /// Who ordered
    pub customer: Customer,

    /// Where it ships
    pub shipping_address: ShippingAddress,

    /// When the order was placed
    pub placed_at: Timestamp,
}

impl LastOrder {
    /// Build the record from the backend receipt and the draft that produced it.
    pub fn from_receipt(
        receipt: &OrderReceipt,
        draft: &CheckoutOrderDraft,
        placed_at: Timestamp,
    ) -> Self {
        Self {
            order_id: receipt.order_id.clone(),
            total: receipt.total,
            currency: draft.total.currency().iso_alpha_code.to_string(),
            payment_method: draft.payment_method,
            customer: draft.customer.clone(),
            shipping_address: draft.shipping_address.clone(),
            placed_at,
        }
    }
}

/// Take-once store for [`LastOrder`].
#[derive(Clone)]
pub struct LastOrderStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl Debug for LastOrderStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LastOrderStore").finish_non_exhaustive()
    }
}

impl LastOrderStore {
    /// Create a store over `storage`.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Record an order, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`LastOrderError`] if the record cannot be encoded or written.
    pub fn put(&self, order: &LastOrder) -> Result<(), LastOrderError> {
        let payload = serde_json::to_string(order)?;

        self.storage.write(LAST_ORDER_KEY, &payload)?;

        Ok(())
    }

    /// Read the recorded order and delete it.
    ///
    /// The record is deleted even when it cannot be decoded.
    ///
    /// # Errors
    ///
    /// Returns a [`LastOrderError`] if storage fails or the payload is invalid.
    pub fn take(&self) -> Result<Option<LastOrder>, LastOrderError> {
        let Some(payload) = self.storage.read(LAST_ORDER_KEY)? else {
            return Ok(None);
        };

        self.storage.remove(LAST_ORDER_KEY)?;

        Ok(Some(serde_json::from_str(&payload)?))
    }
}
