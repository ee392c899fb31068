//! Cart Lines

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::line_total,
    products::{Product, ProductId},
};

/// One product in the cart, with its display data and price frozen at add time.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product_id: ProductId,
    name: String,
    slug: String,
    image: String,
    price: Money<'static, Currency>,
    qty: u32,
}

impl CartLine {
    /// Snapshot a product into a new line with a quantity of one.
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            image: product.image.clone(),
            price: product.price,
            qty: 1,
        }
    }

    /// Rebuild a line from stored parts. Quantities below one are clamped to one.
    pub fn from_parts(
        product_id: ProductId,
        name: String,
        slug: String,
        image: String,
        price: Money<'static, Currency>,
        qty: u32,
    ) -> Self {
        Self {
            product_id,
            name,
            slug,
            image,
            price,
            qty: qty.max(1),
        }
    }

    /// Product id of the line.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Product name at add time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Product slug at add time.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Product image at add time.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Unit price at add time.
    pub fn price(&self) -> &Money<'static, Currency> {
        &self.price
    }

    /// Quantity, always at least one.
    pub fn qty(&self) -> u32 {
        self.qty
    }

    /// Unit price multiplied by quantity.
    pub fn line_total(&self) -> Money<'static, Currency> {
        line_total(&self.price, self.qty)
    }

    pub(crate) fn increment(&mut self) -> u32 {
        self.qty = self.qty.saturating_add(1);
        self.qty
    }

    pub(crate) fn decrement(&mut self) -> u32 {
        self.qty = self.qty.saturating_sub(1).max(1);
        self.qty
    }

    pub(crate) fn merge_qty(&mut self, qty: u32) {
        self.qty = self.qty.saturating_add(qty.max(1));
    }
}
