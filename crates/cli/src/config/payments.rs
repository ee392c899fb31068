//! Payment Polling Config

use std::time::Duration;

use clap::Args;

use grocer_app::payments::PollSettings;

/// Payment status polling settings.
#[derive(Debug, Args)]
pub(crate) struct PaymentPollConfig {
    /// Seconds between payment status checks
    #[arg(
        long,
        env = "PAYMENT_POLL_INTERVAL_SECS",
        default_value_t = 5_u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_secs: u64,

    /// Give up after this many status checks
    #[arg(long, env = "PAYMENT_POLL_MAX_ATTEMPTS")]
    pub poll_max_attempts: Option<u32>,
}

impl PaymentPollConfig {
    /// Poller settings for these options.
    pub fn settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.poll_interval_secs),
            max_attempts: self.poll_max_attempts,
        }
    }
}
