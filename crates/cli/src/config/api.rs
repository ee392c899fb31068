//! API Config

use clap::Args;

use grocer_app::gateway::GatewayConfig;

/// Backend connection settings.
#[derive(Debug, Args)]
pub(crate) struct ApiConfig {
    /// Backend API base address
    #[arg(long, env = "GROCER_API_URL", default_value = "http://localhost:5000/api/v1")]
    pub api_url: String,

    /// Bearer access token for the signed-in customer
    #[arg(long, env = "GROCER_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,
}

impl ApiConfig {
    /// Gateway configuration for these settings.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.api_url.clone(),
            access_token: self.api_token.clone().filter(|token| !token.is_empty()),
        }
    }
}
