//! Subcommands.

use std::io::Write;

use clap::Subcommand;

use grocer_app::context::AppContext;

use crate::errors::CliError;

mod cart;
mod checkout;
mod coupon;
mod locations;
mod order;
mod payment;

pub(crate) use cart::CartCommand;
pub(crate) use checkout::CheckoutArgs;
pub(crate) use coupon::CouponCommand;
pub(crate) use locations::LocationsArgs;
pub(crate) use order::OrderCommand;
pub(crate) use payment::PaymentCommand;

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Show and edit the cart
    Cart(CartCommand),

    /// Check a coupon code against the cart
    Coupon(CouponCommand),

    /// List divisions, districts or upazilas
    Locations(LocationsArgs),

    /// Place an order for the cart
    Checkout(Box<CheckoutArgs>),

    /// Follow an online payment until it settles
    Payment(PaymentCommand),

    /// Show the confirmation of the last placed order
    Order(OrderCommand),
}

/// Run a command against the application context, writing results to `out`.
pub(crate) async fn run(
    command: Command,
    ctx: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Cart(command) => cart::run(command, ctx, out),
        Command::Coupon(command) => coupon::run(command, ctx, out),
        Command::Locations(args) => locations::run(&args, ctx, out),
        Command::Checkout(args) => checkout::run(*args, ctx, out).await,
        Command::Payment(command) => payment::run(command, ctx, out).await,
        Command::Order(command) => order::run(command, ctx, out),
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::sync::Arc;

    use rusty_money::iso::BDT;

    use grocer::{checkout::Locations, coupons::CouponTable};
    use grocer_app::{
        context::AppContext,
        gateway::MockOrdersGateway,
        payments::PollSettings,
        storage::MemoryStorage,
    };

    pub(crate) fn context(
        gateway: MockOrdersGateway,
    ) -> Result<AppContext, Box<dyn std::error::Error>> {
        Ok(AppContext::from_parts(
            Arc::new(MemoryStorage::new()),
            Arc::new(gateway),
            CouponTable::builtin(BDT),
            Locations::bangladesh()?,
            BDT,
            PollSettings::default(),
        ))
    }

    pub(crate) fn output(out: &[u8]) -> String {
        String::from_utf8_lossy(out).into_owned()
    }
}
