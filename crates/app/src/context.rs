//! App Context

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    fs, io,
    path::PathBuf,
    sync::Arc,
};

use rusty_money::iso::Currency;
use thiserror::Error;

use grocer::{
    checkout::{LocationError, Locations},
    coupons::{CouponTable, CouponTableError},
};

use crate::{
    dispatch::OrderDispatcher,
    gateway::{GatewayConfig, HttpOrdersGateway, OrdersGateway},
    last_order::LastOrderStore,
    payments::{PaymentStatusPoller, PollSettings},
    storage::{FileStorage, KeyValueStorage, MemoryStorage},
    store::CartStore,
};

/// Errors raised while wiring the application.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// Coupon file could not be read.
    #[error("failed to read coupon file {path}")]
    CouponsFile {
        /// File path
        path: PathBuf,

        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Coupon table is invalid.
    #[error("invalid coupon table: {0}")]
    Coupons(#[from] CouponTableError),

    /// Coupon table is priced in another currency than the cart.
    #[error("coupon table currency {table} does not match cart currency {cart}")]
    CouponCurrency {
        /// Currency of the coupon table
        table: &'static str,

        /// Currency of the cart
        cart: &'static str,
    },

    /// Location dataset is invalid.
    #[error("invalid location dataset: {0}")]
    Locations(#[from] LocationError),
}

/// Everything needed to build an [`AppContext`].
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Backend connection
    pub gateway: GatewayConfig,

    /// Directory for persisted state; `None` keeps state in memory
    pub storage_dir: Option<PathBuf>,

    /// YAML coupon table replacing the built-in codes
    pub coupons_file: Option<PathBuf>,

    /// Cart currency
    pub currency: &'static Currency,

    /// Payment polling cadence
    pub poll: PollSettings,
}

/// Shared services for a front end.
#[derive(Clone)]
pub struct AppContext {
    /// Persisted cart
    pub cart: CartStore,

    /// Take-once confirmation record
    pub last_order: LastOrderStore,

    /// Order and payment backend
    pub gateway: Arc<dyn OrdersGateway>,

    /// Coupon rules
    pub coupons: Arc<CouponTable>,

    /// Address reference data
    pub locations: Arc<Locations>,

    poll: PollSettings,
}

impl Debug for AppContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AppContext")
            .field("cart", &self.cart)
            .field("coupons", &self.coupons.len())
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from settings.
    ///
    /// # Errors
    ///
    /// Returns an [`AppInitError`] if the coupon table or location data cannot be loaded.
    pub fn from_settings(settings: AppSettings) -> Result<Self, AppInitError> {
        let storage: Arc<dyn KeyValueStorage> = match &settings.storage_dir {
            Some(dir) => Arc::new(FileStorage::new(dir)),
            None => Arc::new(MemoryStorage::new()),
        };

        let coupons = load_coupons(settings.coupons_file.as_ref(), settings.currency)?;
        let gateway: Arc<dyn OrdersGateway> = Arc::new(HttpOrdersGateway::new(settings.gateway));

        Ok(Self::from_parts(
            storage,
            gateway,
            coupons,
            Locations::bangladesh()?,
            settings.currency,
            settings.poll,
        ))
    }

    /// Build application context from already constructed parts.
    pub fn from_parts(
        storage: Arc<dyn KeyValueStorage>,
        gateway: Arc<dyn OrdersGateway>,
        coupons: CouponTable,
        locations: Locations,
        currency: &'static Currency,
        poll: PollSettings,
    ) -> Self {
        Self {
            cart: CartStore::load(storage.clone(), currency),
            last_order: LastOrderStore::new(storage),
            gateway,
            coupons: Arc::new(coupons),
            locations: Arc::new(locations),
            poll,
        }
    }

    /// Dispatcher sharing this context's cart and backend.
    pub fn dispatcher(&self) -> OrderDispatcher {
        OrderDispatcher::new(
            self.gateway.clone(),
            self.cart.clone(),
            self.last_order.clone(),
        )
    }

    /// Payment poller sharing this context's cart and backend.
    pub fn poller(&self) -> PaymentStatusPoller {
        PaymentStatusPoller::new(self.gateway.clone(), self.cart.clone(), self.poll)
    }
}

fn load_coupons(
    path: Option<&PathBuf>,
    currency: &'static Currency,
) -> Result<CouponTable, AppInitError> {
    let Some(path) = path else {
        return Ok(CouponTable::builtin(currency));
    };

    let yaml = fs::read_to_string(path).map_err(|source| AppInitError::CouponsFile {
        path: path.clone(),
        source,
    })?;

    let table = CouponTable::from_yaml(&yaml)?;

    if table.currency() != currency {
        return Err(AppInitError::CouponCurrency {
            table: table.currency().iso_alpha_code,
            cart: currency.iso_alpha_code,
        });
    }

    Ok(table)
}
