//! `grocer cart`

use std::io::Write;

use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use grocer::{
    pricing::from_major,
    products::{Product, ProductId},
    receipt::Receipt,
};
use grocer_app::context::AppContext;

use crate::errors::CliError;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show cart lines and totals
    Show,

    /// Add one unit of a product
    Add(ProductArgs),

    /// Remove a product's line
    Remove {
        /// Product id
        id: String,
    },

    /// Raise a product's quantity by one
    Increment {
        /// Product id
        id: String,
    },

    /// Lower a product's quantity by one (never below one)
    Decrement {
        /// Product id
        id: String,
    },

    /// Remove every line
    Clear,
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Product id
    #[arg(long)]
    id: String,

    /// Product name
    #[arg(long)]
    name: String,

    /// Unit price in major units (e.g. 420.50)
    #[arg(long)]
    price: Decimal,

    /// URL slug, derived from the name when omitted
    #[arg(long)]
    slug: Option<String>,

    /// Image URL
    #[arg(long, default_value = "")]
    image: String,
}

impl ProductArgs {
    fn into_product(self, ctx: &AppContext) -> Result<Product, CliError> {
        let slug = self.slug.unwrap_or_else(|| slugify(&self.name));

        Ok(Product {
            id: ProductId::new(self.id),
            price: from_major(self.price, ctx.cart.currency())?,
            name: self.name,
            slug,
            image: self.image,
        })
    }
}

fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

pub(super) fn run(
    command: CartCommand,
    ctx: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            let product = args.into_product(ctx)?;
            let qty = ctx.cart.add_to_cart(&product)?;

            writeln!(out, "Added {} (quantity {qty}).", product.name)?;
        }
        CartSubcommand::Remove { id } => {
            let id = ProductId::new(id);

            if !ctx.cart.remove_from_cart(&id) {
                return Err(CliError::NotInCart(id));
            }

            writeln!(out, "Removed {id}.")?;
        }
        CartSubcommand::Increment { id } => {
            let id = ProductId::new(id);
            let qty = ctx
                .cart
                .increment_quantity(&id)
                .ok_or_else(|| CliError::NotInCart(id.clone()))?;

            writeln!(out, "{id} quantity is now {qty}.")?;
        }
        CartSubcommand::Decrement { id } => {
            let id = ProductId::new(id);
            let qty = ctx
                .cart
                .decrement_quantity(&id)
                .ok_or_else(|| CliError::NotInCart(id.clone()))?;

            writeln!(out, "{id} quantity is now {qty}.")?;
        }
        CartSubcommand::Clear => {
            ctx.cart.clear_cart();

            writeln!(out, "Cart cleared.")?;
        }
    }

    ctx.cart
        .with_cart(|cart| Receipt::for_cart(cart).write_to(&mut *out))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use grocer_app::gateway::MockOrdersGateway;
    use testresult::TestResult;

    use crate::commands::test_helpers::{context, output};

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        cart: CartCommand,
    }

    fn parse(args: &[&str]) -> Result<CartCommand, clap::Error> {
        TestCli::try_parse_from(std::iter::once("cart").chain(args.iter().copied()))
            .map(|cli| cli.cart)
    }

    #[test]
    fn add_increment_and_remove() -> TestResult {
        let ctx = context(MockOrdersGateway::new())?;
        let mut out = Vec::new();

        run(
            parse(&["add", "--id", "rice", "--name", "Miniket Rice 5kg", "--price", "420"])?,
            &ctx,
            &mut out,
        )?;
        run(parse(&["increment", "rice"])?, &ctx, &mut out)?;

        assert_eq!(ctx.cart.item_quantity(&ProductId::from("rice")), 2);
        assert!(output(&out).contains("rice quantity is now 2."));

        run(parse(&["remove", "rice"])?, &ctx, &mut out)?;

        assert!(ctx.cart.is_empty());

        Ok(())
    }

    #[test]
    fn unknown_product_is_reported() -> TestResult {
        let ctx = context(MockOrdersGateway::new())?;
        let mut out = Vec::new();

        let result = run(parse(&["decrement", "ghost"])?, &ctx, &mut out);

        assert!(matches!(result, Err(CliError::NotInCart(id)) if id.as_str() == "ghost"));

        Ok(())
    }

    #[test]
    fn negative_price_is_refused() -> TestResult {
        let ctx = context(MockOrdersGateway::new())?;
        let mut out = Vec::new();

        let result = run(
            parse(&["add", "--id", "x", "--name", "X", "--price=-5"])?,
            &ctx,
            &mut out,
        );

        assert!(matches!(result, Err(CliError::Price(_))));

        Ok(())
    }

    #[test]
    fn slug_is_derived_from_name() {
        assert_eq!(slugify("Miniket Rice (5kg)"), "miniket-rice-5kg");
    }
}
