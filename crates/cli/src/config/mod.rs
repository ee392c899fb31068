//! CLI configuration module

use clap::Parser;

use grocer_app::context::AppSettings;

use crate::{
    commands::Command,
    config::{
        api::ApiConfig, observability::LoggingConfig, payments::PaymentPollConfig,
        storage::StorageConfig,
    },
};

pub(crate) mod api;
pub(crate) mod observability;
pub(crate) mod payments;
pub(crate) mod storage;

/// Grocer storefront command line
#[derive(Debug, Parser)]
#[command(name = "grocer", about = "Grocer cart and checkout", long_about = None)]
pub(crate) struct Cli {
    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Local state and pricing settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Payment polling settings.
    #[command(flatten)]
    pub payments: PaymentPollConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Settings for wiring the application context.
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            gateway: self.api.gateway_config(),
            storage_dir: self.storage.storage_dir(),
            coupons_file: self.storage.coupons_file.clone(),
            currency: self.storage.currency,
            poll: self.payments.settings(),
        }
    }
}
