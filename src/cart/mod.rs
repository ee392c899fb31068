//! Cart
//!
//! The in-memory cart aggregate. Holds at most one line per product, keeps
//! quantities at or above one, and derives its count and total from the lines
//! on every read.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    orders::OrderItem,
    pricing::sum_minor,
    products::{Product, ProductId},
};

pub mod line;
pub mod records;

pub use line::CartLine;
pub use records::{CartLineRecord, RecordError};

/// Errors related to cart mutations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// A product's currency differs from the cart currency (product, product currency, cart currency).
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),
}

/// Cart
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Rebuild a cart from stored records.
    ///
    /// Records are pushed through the same rules as live mutations: repeated
    /// products merge into one line and quantities below one become one.
    /// Records that cannot be converted are returned alongside the cart.
    pub fn from_records(
        currency: &'static Currency,
        records: impl IntoIterator<Item = CartLineRecord>,
    ) -> (Self, Vec<RecordError>) {
        let mut cart = Cart::new(currency);
        let mut rejected = Vec::new();

        for record in records {
            match record.into_line(currency) {
                Ok(line) => cart.merge_line(line),
                Err(error) => rejected.push(error),
            }
        }

        (cart, rejected)
    }

    /// Snapshot the cart into storable records.
    pub fn to_records(&self) -> Vec<CartLineRecord> {
        self.lines.iter().map(CartLineRecord::from).collect()
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart has its quantity raised by one; otherwise
    /// a new line is created from the product as it is right now.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the product is priced in another currency.
    pub fn add_to_cart(&mut self, product: &Product) -> Result<u32, CartError> {
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product.id.clone(),
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(line) = self.line_mut(&product.id) {
            return Ok(line.increment());
        }

        self.lines.push(CartLine::from_product(product));

        Ok(1)
    }

    /// Remove a product's line entirely. Returns whether a line was removed.
    pub fn remove_from_cart(&mut self, product: &ProductId) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.product_id() != product);

        self.lines.len() != before
    }

    /// Raise a line's quantity by one. Returns the new quantity, or `None` if absent.
    pub fn increment_quantity(&mut self, product: &ProductId) -> Option<u32> {
        self.line_mut(product).map(CartLine::increment)
    }

    /// Lower a line's quantity by one, stopping at one. Returns the new quantity, or `None` if absent.
    pub fn decrement_quantity(&mut self, product: &ProductId) -> Option<u32> {
        self.line_mut(product).map(CartLine::decrement)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Find the line for a product.
    pub fn line(&self, product: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == product)
    }

    /// Whether the product has a line in the cart.
    pub fn is_in_cart(&self, product: &ProductId) -> bool {
        self.line(product).is_some()
    }

    /// Quantity of a product in the cart, zero if absent.
    pub fn item_quantity(&self, product: &ProductId) -> u32 {
        self.line(product).map_or(0, CartLine::qty)
    }

    /// Total number of units across all lines.
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .map(CartLine::qty)
            .fold(0, u32::saturating_add)
    }

    /// Sum of unit price times quantity across all lines.
    pub fn total(&self) -> Money<'static, Currency> {
        let minor = sum_minor(
            self.lines
                .iter()
                .map(|line| line.line_total().to_minor_units()),
        );

        Money::from_minor(minor, self.currency)
    }

    /// Reshape the lines into the item shape expected by order and payment collaborators.
    pub fn order_items(&self) -> Vec<OrderItem> {
        self.lines.iter().map(OrderItem::from).collect()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn line_mut(&mut self, product: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id() == product)
    }

    fn merge_line(&mut self, line: CartLine) {
        if let Some(existing) = self.line_mut(line.product_id()) {
            existing.merge_qty(line.qty());
        } else {
            self.lines.push(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::{BDT, USD};
    use testresult::TestResult;

    use super::*;

    fn product(id: &str, price_minor: i64) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("Product {id}"),
            slug: id.to_string(),
            image: format!("https://cdn.example.com/{id}.png"),
            price: Money::from_minor(price_minor, BDT),
        }
    }

    #[test]
    fn repeated_adds_keep_one_line() -> TestResult {
        let mut cart = Cart::new(BDT);
        let milk = product("milk", 90_00);

        for _ in 0..5 {
            cart.add_to_cart(&milk)?;
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_quantity(&milk.id), 5);

        Ok(())
    }

    #[test]
    fn add_keeps_price_snapshot() -> TestResult {
        let mut cart = Cart::new(BDT);
        let mut milk = product("milk", 90_00);

        cart.add_to_cart(&milk)?;

        milk.price = Money::from_minor(120_00, BDT);
        milk.name = "Renamed".to_string();
        cart.add_to_cart(&milk)?;

        let line = cart.line(&milk.id).ok_or("missing line")?;

        assert_eq!(line.price(), &Money::from_minor(90_00, BDT));
        assert_eq!(line.name(), "Product milk");
        assert_eq!(line.qty(), 2);

        Ok(())
    }

    #[test]
    fn add_rejects_other_currency() {
        let mut cart = Cart::new(BDT);
        let mut imported = product("imported", 5_00);
        imported.price = Money::from_minor(5_00, USD);

        let result = cart.add_to_cart(&imported);

        assert_eq!(
            result,
            Err(CartError::CurrencyMismatch(
                ProductId::from("imported"),
                "USD",
                "BDT"
            ))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn decrement_never_goes_below_one() -> TestResult {
        let mut cart = Cart::new(BDT);
        let bread = product("bread", 60_00);

        cart.add_to_cart(&bread)?;

        assert_eq!(cart.decrement_quantity(&bread.id), Some(1));
        assert_eq!(cart.decrement_quantity(&bread.id), Some(1));
        assert!(cart.is_in_cart(&bread.id));

        Ok(())
    }

    #[test]
    fn increment_and_decrement_missing_line_are_no_ops() {
        let mut cart = Cart::new(BDT);
        let missing = ProductId::from("missing");

        assert_eq!(cart.increment_quantity(&missing), None);
        assert_eq!(cart.decrement_quantity(&missing), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn remove_is_idempotent() -> TestResult {
        let mut cart = Cart::new(BDT);
        let eggs = product("eggs", 150_00);

        cart.add_to_cart(&eggs)?;
        cart.increment_quantity(&eggs.id);

        assert!(cart.remove_from_cart(&eggs.id));
        assert!(!cart.remove_from_cart(&eggs.id));
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn total_and_count_follow_every_mutation() -> TestResult {
        let mut cart = Cart::new(BDT);
        let rice = product("rice", 420_00);
        let oil = product("oil", 185_50);

        cart.add_to_cart(&rice)?;
        cart.add_to_cart(&oil)?;
        cart.increment_quantity(&oil.id);

        assert_eq!(cart.count(), 3);
        assert_eq!(cart.total(), Money::from_minor(420_00 + 2 * 185_50, BDT));

        cart.decrement_quantity(&oil.id);
        cart.remove_from_cart(&rice.id);

        assert_eq!(cart.count(), 1);
        assert_eq!(cart.total(), Money::from_minor(185_50, BDT));

        Ok(())
    }

    #[test]
    fn clear_empties_totals() -> TestResult {
        let mut cart = Cart::new(BDT);

        cart.add_to_cart(&product("salt", 40_00))?;
        cart.clear();

        assert_eq!(cart.count(), 0);
        assert_eq!(cart.total(), Money::from_minor(0, BDT));
        assert!(cart.to_records().is_empty());

        Ok(())
    }

    #[test]
    fn lines_keep_insertion_order() -> TestResult {
        let mut cart = Cart::new(BDT);

        cart.add_to_cart(&product("b", 1_00))?;
        cart.add_to_cart(&product("a", 1_00))?;
        cart.add_to_cart(&product("b", 1_00))?;

        let ids: Vec<&str> = cart
            .lines()
            .iter()
            .map(|line| line.product_id().as_str())
            .collect();

        assert_eq!(ids, vec!["b", "a"]);

        Ok(())
    }

    #[test]
    fn from_records_merges_duplicates_and_reports_rejects() {
        let record = |id: &str, qty: i64, currency: &str| CartLineRecord {
            product_id: ProductId::from(id),
            name: id.to_string(),
            slug: id.to_string(),
            image: String::new(),
            price: Decimal::new(25, 0),
            currency: Some(currency.to_string()),
            qty,
        };

        let (cart, rejected) = Cart::from_records(
            BDT,
            [
                record("tea", 2, "BDT"),
                record("tea", 0, "BDT"),
                record("coffee", 1, "USD"),
            ],
        );

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_quantity(&ProductId::from("tea")), 3);
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn order_items_mirror_lines() -> TestResult {
        let mut cart = Cart::new(BDT);
        let rice = product("rice", 420_00);

        cart.add_to_cart(&rice)?;
        cart.add_to_cart(&rice)?;

        let items = cart.order_items();

        assert_eq!(items.len(), 1);
        assert_eq!(items.first().map(|item| item.quantity), Some(2));

        Ok(())
    }
}
