//! Grocer storefront CLI
//!
//! Keeps a persisted cart, prices it with coupons, and places orders against
//! the storefront backend.

use std::{io, process::ExitCode};

use tracing::error;

use grocer_app::context::AppContext;

use crate::config::Cli;

mod commands;
mod config;
mod errors;
mod observability;
mod shutdown;

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(error) => error.exit(),
    };

    if let Err(init_error) = observability::init_subscriber(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{init_error}");
        }

        return ExitCode::FAILURE;
    }

    let ctx = match AppContext::from_settings(cli.app_settings()) {
        Ok(ctx) => ctx,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            return ExitCode::FAILURE;
        }
    };

    if let Err(command_error) = commands::run(cli.command, &ctx, &mut io::stdout().lock()).await {
        error!("{command_error}");

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
