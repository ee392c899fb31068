//! `grocer checkout`

use std::io::Write;

use clap::Args;

use grocer::{
    checkout::{Checkout, CheckoutForm, Customer, Locations, ShippingAddress},
    orders::PaymentMethod,
    receipt::Receipt,
};
use grocer_app::{context::AppContext, dispatch::SubmissionOutcome};

use crate::errors::CliError;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Full name
    #[arg(long, default_value = "")]
    name: String,

    /// Email address
    #[arg(long, default_value = "")]
    email: String,

    /// Phone number
    #[arg(long, default_value = "")]
    phone: String,

    /// Division
    #[arg(long, default_value = "")]
    division: String,

    /// District within the division
    #[arg(long, default_value = "")]
    district: String,

    /// Upazila within the district
    #[arg(long, default_value = "")]
    upazila: String,

    /// Postal code
    #[arg(long)]
    postal_code: Option<String>,

    /// House, road and area details
    #[arg(long = "address", default_value = "")]
    details_address: String,

    /// Payment method (COD or ShurjoPay)
    #[arg(long, default_value_t = PaymentMethod::CashOnDelivery)]
    payment_method: PaymentMethod,

    /// Coupon code to apply
    #[arg(long)]
    coupon: Option<String>,

    /// Print the order draft instead of submitting it
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

impl CheckoutArgs {
    fn form(&self, locations: &Locations) -> Result<CheckoutForm, CliError> {
        let mut address = ShippingAddress {
            postal_code: self.postal_code.clone(),
            details_address: self.details_address.clone(),
            ..ShippingAddress::default()
        };

        if !self.division.trim().is_empty() {
            locations.select_division(&mut address, &self.division)?;
        }

        if !self.district.trim().is_empty() {
            locations.select_district(&mut address, &self.district)?;
        }

        if !self.upazila.trim().is_empty() {
            locations.select_upazila(&mut address, &self.upazila)?;
        }

        Ok(CheckoutForm {
            customer: Customer {
                name: self.name.clone(),
                email: self.email.clone(),
                phone: self.phone.clone(),
            },
            address,
        })
    }
}

pub(super) async fn run(
    args: CheckoutArgs,
    ctx: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let cart = ctx.cart.snapshot();

    let mut checkout = Checkout::with_form(args.form(&ctx.locations)?);
    checkout.set_payment_method(args.payment_method);

    if let Some(code) = &args.coupon {
        checkout.apply_coupon(&ctx.coupons, code, &cart)?;
    }

    Receipt::for_checkout(&cart, &checkout)?.write_to(&mut *out)?;

    let draft = checkout.draft(&cart)?;

    if args.dry_run {
        writeln!(out, "{}", serde_json::to_string_pretty(&draft)?)?;

        return Ok(());
    }

    match ctx.dispatcher().submit(&draft).await? {
        SubmissionOutcome::Placed(order) => {
            writeln!(
                out,
                "Order {} placed. Pay {} {} on delivery.",
                order.order_id, order.currency, order.total
            )?;
        }
        SubmissionOutcome::Redirect {
            payment_url,
            order_id,
        } => {
            writeln!(out, "Complete your payment at:\n  {payment_url}")?;

            match order_id {
                Some(order_id) => writeln!(
                    out,
                    "Then run `grocer payment watch {order_id}` to confirm it."
                )?,
                None => writeln!(
                    out,
                    "Then run `grocer payment watch <ORDER_ID>` with the `order_id` from the \
                     address the payment page returns you to."
                )?,
            }
        }
    }

    Ok(())
}
