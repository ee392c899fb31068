//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Catalog identifier of a product, as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A catalog product as seen at the moment it is added to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// URL slug
    pub slug: String,

    /// Image URL
    pub image: String,

    /// Current unit price
    pub price: Money<'static, Currency>,
}
