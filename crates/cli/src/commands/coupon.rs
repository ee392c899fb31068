//! `grocer coupon`

use std::io::Write;

use clap::{Args, Subcommand};

use grocer::{checkout::Checkout, receipt::Receipt};
use grocer_app::context::AppContext;

use crate::errors::CliError;

#[derive(Debug, Args)]
pub(crate) struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    /// Check whether a code applies to the current cart and show the discounted totals
    Check {
        /// Coupon code (case-insensitive)
        code: String,
    },
}

pub(super) fn run(
    command: CouponCommand,
    ctx: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let CouponSubcommand::Check { code } = command.command;

    let cart = ctx.cart.snapshot();
    let mut checkout = Checkout::new();

    let coupon = checkout.apply_coupon(&ctx.coupons, &code, &cart)?;

    writeln!(out, "Coupon {} applies.", coupon.code())?;

    Receipt::for_checkout(&cart, &checkout)?.write_to(&mut *out)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use grocer::{
        coupons::CouponError,
        products::{Product, ProductId},
    };
    use grocer_app::gateway::MockOrdersGateway;
    use rusty_money::{Money, iso::BDT};
    use testresult::TestResult;

    use crate::commands::test_helpers::{context, output};

    use super::*;

    fn check(code: &str) -> CouponCommand {
        CouponCommand {
            command: CouponSubcommand::Check {
                code: code.to_string(),
            },
        }
    }

    fn add_product(ctx: &AppContext, price_major: i64) -> TestResult {
        ctx.cart.add_to_cart(&Product {
            id: ProductId::from("basket"),
            name: "Weekly basket".to_string(),
            slug: "weekly-basket".to_string(),
            image: String::new(),
            price: Money::from_minor(price_major * 100, BDT),
        })?;

        Ok(())
    }

    #[test]
    fn eligible_code_shows_discount() -> TestResult {
        let ctx = context(MockOrdersGateway::new())?;
        add_product(&ctx, 1000)?;

        let mut out = Vec::new();
        run(check("save10"), &ctx, &mut out)?;

        let text = output(&out);

        assert!(text.contains("Coupon SAVE10 applies."));
        assert!(text.contains("Discount (SAVE10):"));

        Ok(())
    }

    #[test]
    fn minimum_not_met_is_refused() -> TestResult {
        let ctx = context(MockOrdersGateway::new())?;
        add_product(&ctx, 400)?;

        let result = run(check("SAVE10"), &ctx, &mut Vec::new());

        assert!(matches!(
            result,
            Err(CliError::Coupon(CouponError::MinimumOrderNotMet(_)))
        ));

        Ok(())
    }
}
