//! `grocer payment`

use std::io::Write;

use clap::{Args, Subcommand};

use grocer_app::{context::AppContext, payments::PaymentOutcome};

use crate::{errors::CliError, shutdown};

#[derive(Debug, Args)]
pub(crate) struct PaymentCommand {
    #[command(subcommand)]
    command: PaymentSubcommand,
}

#[derive(Debug, Subcommand)]
enum PaymentSubcommand {
    /// Verify an online payment and poll its status until it settles
    Watch {
        /// Backend order id returned by the payment page
        order_id: String,
    },
}

pub(super) async fn run(
    command: PaymentCommand,
    ctx: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let PaymentSubcommand::Watch { order_id } = command.command;

    writeln!(out, "Waiting for payment of order {order_id}...")?;
    out.flush()?;

    let mut watch = ctx.poller().watch(order_id);

    let finished = tokio::select! {
        outcome = watch.outcome() => Some(outcome?),
        signal = shutdown::signal() => {
            signal?;
            None
        }
    };

    let outcome = match finished {
        Some(outcome) => outcome,
        None => {
            watch.cancel();
            watch.outcome().await?
        }
    };

    write_outcome(&outcome, out)
}

fn write_outcome(outcome: &PaymentOutcome, out: &mut impl Write) -> Result<(), CliError> {
    match outcome {
        PaymentOutcome::Paid { order_id, total } => {
            writeln!(
                out,
                "Payment of {total} received for order {order_id}. Your cart has been cleared."
            )?;
        }
        PaymentOutcome::Failed { order_id } => {
            writeln!(
                out,
                "Payment for order {order_id} failed. Your cart was kept; try again."
            )?;
        }
        PaymentOutcome::TimedOut { order_id, attempts } => {
            writeln!(
                out,
                "Payment for order {order_id} is still pending after {attempts} checks."
            )?;
        }
        PaymentOutcome::Cancelled => writeln!(out, "Stopped waiting for payment.")?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use grocer::products::{Product, ProductId};
    use grocer_app::gateway::{MockOrdersGateway, PaymentStatus, PaymentStatusReport};
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::BDT};
    use testresult::TestResult;

    use crate::commands::test_helpers::{context, output};

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        payment: PaymentCommand,
    }

    #[tokio::test]
    async fn paid_order_reports_and_clears_cart() -> TestResult {
        let mut gateway = MockOrdersGateway::new();

        gateway
            .expect_verify_payment()
            .once()
            .withf(|order_id| order_id == "66f1")
            .returning(|_| Ok(()));
        gateway.expect_payment_status().returning(|order_id| {
            Ok(PaymentStatusReport {
                order_id: order_id.to_string(),
                status: PaymentStatus::Paid,
                total: Decimal::from(250),
            })
        });

        let ctx = context(gateway)?;
        ctx.cart.add_to_cart(&Product {
            id: ProductId::from("flour"),
            name: "Atta 2kg".to_string(),
            slug: "atta-2kg".to_string(),
            image: String::new(),
            price: Money::from_minor(25_000, BDT),
        })?;

        let command = TestCli::try_parse_from(["payment", "watch", "66f1"])?.payment;

        let mut out = Vec::new();
        run(command, &ctx, &mut out).await?;

        assert!(output(&out).contains("Payment of 250 received for order 66f1."));
        assert!(ctx.cart.is_empty());

        Ok(())
    }

    #[test]
    fn failed_outcome_mentions_kept_cart() -> TestResult {
        let mut out = Vec::new();

        write_outcome(
            &PaymentOutcome::Failed {
                order_id: "66f1".to_string(),
            },
            &mut out,
        )?;

        assert!(output(&out).contains("Your cart was kept"));

        Ok(())
    }
}
