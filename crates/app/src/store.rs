//! Cart Store
//!
//! Shared, persisted cart. Every mutation is written through to storage under
//! [`CART_KEY`] and announced to subscribers. Storage failures are logged and
//! never surface to callers; the in-memory cart stays authoritative.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use rusty_money::{Money, iso::Currency};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use grocer::{
    cart::{Cart, CartError, CartLineRecord},
    orders::OrderItem,
    products::{Product, ProductId},
};

use crate::storage::KeyValueStorage;

/// Storage key of the persisted cart.
pub const CART_KEY: &str = "cart";

const EVENT_CAPACITY: usize = 64;

/// Count and total at the moment of a change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartSummary {
    /// Sum of quantities
    pub count: u32,

    /// Sum of line totals
    pub total: Money<'static, Currency>,
}

impl CartSummary {
    fn of(cart: &Cart) -> Self {
        Self {
            count: cart.count(),
            total: cart.total(),
        }
    }
}

/// Change notification published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CartEvent {
    /// The cart was (re)read from storage.
    Loaded(CartSummary),

    /// The cart was mutated.
    Changed(CartSummary),
}

struct Inner {
    cart: Mutex<Cart>,
    storage: Arc<dyn KeyValueStorage>,
    loaded: AtomicBool,
    events: broadcast::Sender<CartEvent>,
}

/// Cloneable handle to the shared cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

impl Debug for CartStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartStore")
            .field("cart", &*self.lock())
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a store with an empty cart that has not been read from storage yet.
    pub fn new(storage: Arc<dyn KeyValueStorage>, currency: &'static Currency) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                cart: Mutex::new(Cart::new(currency)),
                storage,
                loaded: AtomicBool::new(false),
                events,
            }),
        }
    }

    /// Create a store and rehydrate it from storage.
    pub fn load(storage: Arc<dyn KeyValueStorage>, currency: &'static Currency) -> Self {
        let store = Self::new(storage, currency);

        store.sync_from_storage();

        store
    }

    /// Replace the in-memory cart with the persisted one.
    ///
    /// Unreadable payloads yield an empty cart; records that cannot be
    /// restored are dropped with a warning. When storage itself fails the
    /// in-memory cart is kept.
    pub fn sync_from_storage(&self) {
        let mut cart = self.lock();

        match self.inner.storage.read(CART_KEY) {
            Ok(payload) => {
                let records = payload.as_deref().map(decode_records).unwrap_or_default();
                let (restored, rejected) = Cart::from_records(cart.currency(), records);

                for error in rejected {
                    warn!(%error, "dropping stored cart line");
                }

                *cart = restored;

                debug!(lines = cart.len(), "cart loaded");
            }
            Err(error) => warn!(%error, "failed to read stored cart, keeping session cart"),
        }

        self.inner.loaded.store(true, Ordering::Release);

        _ = self.inner.events.send(CartEvent::Loaded(CartSummary::of(&cart)));
    }

    /// Whether the cart has been read from storage at least once.
    pub fn is_loaded(&self) -> bool {
        self.inner.loaded.load(Ordering::Acquire)
    }

    /// Receive a [`CartEvent`] for every subsequent load and mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.inner.events.subscribe()
    }

    /// Add one unit of a product, returning the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the product is priced in another currency.
    pub fn add_to_cart(&self, product: &Product) -> Result<u32, CartError> {
        self.mutate(|cart| cart.add_to_cart(product))
    }

    /// Remove a product's line. Returns whether a line was removed.
    pub fn remove_from_cart(&self, product: &ProductId) -> bool {
        self.mutate(|cart| cart.remove_from_cart(product))
    }

    /// Raise a line's quantity by one. `None` if the product is not in the cart.
    pub fn increment_quantity(&self, product: &ProductId) -> Option<u32> {
        self.mutate(|cart| cart.increment_quantity(product))
    }

    /// Lower a line's quantity by one, stopping at one. `None` if the product is not in the cart.
    pub fn decrement_quantity(&self, product: &ProductId) -> Option<u32> {
        self.mutate(|cart| cart.decrement_quantity(product))
    }

    /// Empty the cart.
    pub fn clear_cart(&self) {
        self.mutate(Cart::clear);
    }

    /// Copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    /// Read the cart without copying it.
    pub fn with_cart<R>(&self, read: impl FnOnce(&Cart) -> R) -> R {
        read(&*self.lock())
    }

    /// Sum of line totals.
    pub fn total(&self) -> Money<'static, Currency> {
        self.lock().total()
    }

    /// Sum of quantities.
    pub fn count(&self) -> u32 {
        self.lock().count()
    }

    /// Whether the product has a line.
    pub fn is_in_cart(&self, product: &ProductId) -> bool {
        self.lock().is_in_cart(product)
    }

    /// Quantity of the product, zero if absent.
    pub fn item_quantity(&self, product: &ProductId) -> u32 {
        self.lock().item_quantity(product)
    }

    /// Lines reshaped for order submission.
    pub fn order_items(&self) -> Vec<OrderItem> {
        self.lock().order_items()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.lock().currency()
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.inner.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate<R>(&self, change: impl FnOnce(&mut Cart) -> R) -> R {
        let mut cart = self.lock();
        let before = cart.clone();
        let result = change(&mut *cart);

        if *cart == before {
            return result;
        }

        self.persist(&cart);

        _ = self.inner.events.send(CartEvent::Changed(CartSummary::of(&cart)));

        result
    }

    fn persist(&self, cart: &Cart) {
        let payload = match serde_json::to_string(&cart.to_records()) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(%error, "failed to serialize cart");

                return;
            }
        };

        if let Err(error) = self.inner.storage.write(CART_KEY, &payload) {
            warn!(%error, "failed to persist cart");
        }
    }
}

/// Decode a stored cart element by element so one bad record does not lose the rest.
fn decode_records(payload: &str) -> Vec<CartLineRecord> {
    let values = match serde_json::from_str::<Vec<serde_json::Value>>(payload) {
        Ok(values) => values,
        Err(error) => {
            warn!(%error, "discarding unreadable stored cart");

            return Vec::new();
        }
    };

    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(%error, "dropping malformed stored cart line");

                None
            }
        })
        .collect()
}
