//! Storage Config

use std::path::PathBuf;

use clap::Args;
use rusty_money::{Findable, iso::Currency};

/// Local state and pricing settings.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// Directory for the persisted cart and last order
    #[arg(long, env = "GROCER_STORAGE_DIR", default_value = ".grocer")]
    pub storage_dir: PathBuf,

    /// Keep state in memory only (nothing survives the command)
    #[arg(long, default_value_t = false)]
    pub in_memory: bool,

    /// YAML coupon table replacing the built-in codes
    #[arg(long, env = "GROCER_COUPONS_FILE")]
    pub coupons_file: Option<PathBuf>,

    /// ISO currency code for cart prices
    #[arg(long, env = "GROCER_CURRENCY", default_value = "BDT", value_parser = parse_currency)]
    pub currency: &'static Currency,
}

impl StorageConfig {
    /// Storage directory, or `None` when state is kept in memory.
    pub fn storage_dir(&self) -> Option<PathBuf> {
        (!self.in_memory).then(|| self.storage_dir.clone())
    }
}

fn parse_currency(code: &str) -> Result<&'static Currency, String> {
    Currency::find(&code.trim().to_ascii_uppercase())
        .ok_or_else(|| format!("unknown currency code {code:?}"))
}
