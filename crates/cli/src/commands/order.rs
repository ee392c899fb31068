//! `grocer order`

use std::io::Write;

use clap::{Args, Subcommand};

use grocer_app::{context::AppContext, last_order::LastOrder};

use crate::errors::CliError;

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Show the last placed order once, then forget it
    Last,
}

pub(super) fn run(
    command: OrderCommand,
    ctx: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let OrderSubcommand::Last = command.command;

    match ctx.last_order.take()? {
        Some(order) => write_order(&order, out)?,
        None => writeln!(out, "No recent order.")?,
    }

    Ok(())
}

fn write_order(order: &LastOrder, out: &mut impl Write) -> Result<(), CliError> {
    let address = &order.shipping_address;

    writeln!(out, "Thank you, {}!", order.customer.name)?;
    writeln!(out, "Order:    {}", order.order_id)?;
    writeln!(out, "Total:    {} {}", order.currency, order.total)?;
    writeln!(out, "Payment:  {}", order.payment_method)?;
    writeln!(out, "Placed:   {}", order.placed_at)?;
    writeln!(
        out,
        "Ship to:  {}, {}, {}, {}, {}",
        address.details_address,
        address.upazila,
        address.district,
        address.division,
        address.country
    )?;

    if let Some(postal_code) = &address.postal_code {
        writeln!(out, "Postcode: {postal_code}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use grocer::{
        checkout::{Customer, ShippingAddress},
        orders::PaymentMethod,
    };
    use grocer_app::gateway::MockOrdersGateway;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::commands::test_helpers::{context, output};

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        order: OrderCommand,
    }

    fn last() -> Result<OrderCommand, clap::Error> {
        TestCli::try_parse_from(["order", "last"]).map(|cli| cli.order)
    }

    #[test]
    fn confirmation_is_shown_once() -> TestResult {
        let ctx = context(MockOrdersGateway::new())?;

        ctx.last_order.put(&LastOrder {
            order_id: "66f1".to_string(),
            total: Decimal::from(936),
            currency: "BDT".to_string(),
            payment_method: PaymentMethod::CashOnDelivery,
            customer: Customer {
                name: "Rafiq Islam".to_string(),
                email: "rafiq@example.com".to_string(),
                phone: "01711000000".to_string(),
            },
            shipping_address: ShippingAddress {
                division: "Dhaka".to_string(),
                district: "Gazipur".to_string(),
                upazila: "Kaliakair".to_string(),
                postal_code: Some("1750".to_string()),
                details_address: "Road 3, House 12".to_string(),
                ..ShippingAddress::default()
            },
            placed_at: "2024-05-01T10:00:00Z".parse()?,
        })?;

        let mut first = Vec::new();
        run(last()?, &ctx, &mut first)?;

        let first = output(&first);

        assert!(first.contains("Thank you, Rafiq Islam!"));
        assert!(first.contains("Total:    BDT 936"));
        assert!(first.contains("Postcode: 1750"));

        let mut second = Vec::new();
        run(last()?, &ctx, &mut second)?;

        assert_eq!(output(&second), "No recent order.\n");

        Ok(())
    }
}
