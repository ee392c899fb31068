//! Receipt
//!
//! Terminal rendering of a cart and its checkout totals.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    checkout::{Checkout, CheckoutError, CheckoutTotals},
    pricing::zero,
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Totals could not be computed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Writing to the output failed.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// A cart with the totals payable for it.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    cart: &'a Cart,
    totals: CheckoutTotals,
    coupon: Option<&'a str>,
}

impl<'a> Receipt<'a> {
    /// Receipt for a cart with no coupon.
    pub fn for_cart(cart: &'a Cart) -> Self {
        let subtotal = cart.total();

        Self {
            cart,
            totals: CheckoutTotals {
                subtotal,
                discount: zero(cart.currency()),
                total: subtotal,
            },
            coupon: None,
        }
    }

    /// Receipt for a cart at checkout, including any applied coupon.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Checkout`] if the discount cannot be computed.
    pub fn for_checkout(cart: &'a Cart, checkout: &'a Checkout) -> Result<Self, ReceiptError> {
        Ok(Self {
            cart,
            totals: checkout.totals(cart)?,
            coupon: checkout.coupon().applied_code(),
        })
    }

    /// Totals shown on the receipt.
    pub fn totals(&self) -> &CheckoutTotals {
        &self.totals
    }

    /// Writes the receipt table and summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.cart.is_empty() {
            writeln!(out, "\nYour cart is empty.\n")?;

            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Unit Price", "Qty", "Line Total"]);

        for (idx, line) in self.cart.lines().iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name().to_string(),
                format!("{}", line.price()),
                line.qty().to_string(),
                format!("{}", line.line_total()),
            ]);
        }

        write_receipt_table(&mut out, builder)?;
        write_receipt_summary(&mut out, self)?;

        Ok(())
    }
}

const DIM: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn write_receipt_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..5), Alignment::right());
    table.modify(Columns::first(), Color::new(DIM, RESET));

    writeln!(out, "\n{}", dim_borders(&table.to_string()))?;

    Ok(())
}

/// One row under the table: a label and an amount, right-aligned in two columns.
struct SummaryRow {
    label: String,
    amount: String,
    emphasised: bool,
}

impl SummaryRow {
    fn new(label: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            amount: amount.into(),
            emphasised: false,
        }
    }

    fn emphasised(mut self) -> Self {
        self.emphasised = true;
        self
    }

    fn write(
        &self,
        out: &mut impl io::Write,
        label_width: usize,
        amount_width: usize,
    ) -> io::Result<()> {
        let (on, off) = if self.emphasised { (BOLD, RESET) } else { ("", "") };

        writeln!(
            out,
            " {on}{label:>label_width$}{off}  {on}{amount:>amount_width$}{off}",
            label = self.label,
            amount = self.amount,
        )
    }
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    receipt: &Receipt<'_>,
) -> Result<(), ReceiptError> {
    let CheckoutTotals {
        subtotal,
        discount,
        total,
    } = receipt.totals;

    let mut rows = vec![SummaryRow::new("Subtotal:", subtotal.to_string())];

    if !discount.is_zero() {
        let label = match receipt.coupon {
            Some(code) => format!("Discount ({code}):"),
            None => "Discount:".to_string(),
        };

        rows.push(SummaryRow::new(label, format!("-{}", money_abs(&discount))));
    }

    rows.push(SummaryRow::new("Total:", total.to_string()).emphasised());

    let label_width = rows.iter().map(|row| row.label.chars().count()).max().unwrap_or(0);
    let amount_width = rows.iter().map(|row| row.amount.chars().count()).max().unwrap_or(0);

    for row in &rows {
        row.write(out, label_width, amount_width)?;
    }

    writeln!(out)?;

    Ok(())
}

fn money_abs(money: &Money<'static, Currency>) -> Money<'static, Currency> {
    Money::from_minor(money.to_minor_units().saturating_abs(), money.currency())
}

fn is_box_drawing(ch: char) -> bool {
    matches!(ch, '\u{2500}'..='\u{257F}')
}

/// Dims table borders, leaving cell text untouched.
fn dim_borders(table: &str) -> String {
    let mut dimmed = String::with_capacity(table.len() * 2);
    let mut chars = table.chars().peekable();

    while let Some(ch) = chars.next() {
        if !is_box_drawing(ch) {
            dimmed.push(ch);
            continue;
        }

        dimmed.push_str(DIM);
        dimmed.push(ch);

        while let Some(next) = chars.next_if(|next| is_box_drawing(*next)) {
            dimmed.push(next);
        }

        dimmed.push_str(RESET);
    }

    dimmed
}
