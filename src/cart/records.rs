//! Cart Records
//!
//! The serialized shape of a cart line, as kept in durable client storage.

use rust_decimal::Decimal;
use rusty_money::{Findable, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::line::CartLine,
    pricing::{PricingError, from_major, to_major},
    products::ProductId,
};

/// Errors raised while turning a stored record back into a cart line.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    /// The record names a currency that is not an ISO currency.
    #[error("unknown currency code {0}")]
    UnknownCurrency(String),

    /// The record's currency differs from the cart's.
    #[error("record for {product} is priced in {found}, cart is in {expected}")]
    CurrencyMismatch {
        /// Product the record belongs to
        product: ProductId,
        /// Currency of the record
        found: String,
        /// Currency of the cart
        expected: &'static str,
    },

    /// The stored price could not be converted.
    #[error(transparent)]
    Price(#[from] PricingError),
}

/// Stored cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRecord {
    /// Product id
    pub product_id: ProductId,

    /// Product name
    pub name: String,

    /// Product slug
    pub slug: String,

    /// Product image
    #[serde(default)]
    pub image: String,

    /// Unit price in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// ISO currency code of the price; records without one are in the cart currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Quantity; values below one restore as one
    pub qty: i64,
}

impl From<&CartLine> for CartLineRecord {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id().clone(),
            name: line.name().to_string(),
            slug: line.slug().to_string(),
            image: line.image().to_string(),
            price: to_major(line.price()),
            currency: Some(line.price().currency().iso_alpha_code.to_string()),
            qty: i64::from(line.qty()),
        }
    }
}

impl CartLineRecord {
    /// Convert the record into a line priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] if the currency is unknown or differs from `currency`, or
    /// the price cannot be represented.
    pub fn into_line(self, currency: &'static Currency) -> Result<CartLine, RecordError> {
        if let Some(code) = self.currency {
            let Some(found) = Currency::find(&code) else {
                return Err(RecordError::UnknownCurrency(code));
            };

            if found != currency {
                return Err(RecordError::CurrencyMismatch {
                    product: self.product_id,
                    found: code,
                    expected: currency.iso_alpha_code,
                });
            }
        }

        let price = from_major(self.price, currency)?;

        Ok(CartLine::from_parts(
            self.product_id,
            self.name,
            self.slug,
            self.image,
            price,
            u32::try_from(self.qty.max(1)).unwrap_or(u32::MAX),
        ))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::BDT;
    use testresult::TestResult;

    use super::*;

    fn record() -> CartLineRecord {
        CartLineRecord {
            product_id: ProductId::from("eggs-12"),
            name: "Farm Eggs (12)".to_string(),
            slug: "farm-eggs-12".to_string(),
            image: String::new(),
            price: Decimal::new(150, 0),
            currency: Some("BDT".to_string()),
            qty: 2,
        }
    }

    #[test]
    fn into_line_restores_price_and_quantity() -> TestResult {
        let line = record().into_line(BDT)?;

        assert_eq!(line.price().to_minor_units(), 150_00);
        assert_eq!(line.qty(), 2);

        Ok(())
    }

    #[test]
    fn into_line_rejects_other_currency() {
        let mut record = record();
        record.currency = Some("USD".to_string());

        let result = record.into_line(BDT);

        assert!(matches!(
            result,
            Err(RecordError::CurrencyMismatch { expected: "BDT", .. })
        ));
    }

    #[test]
    fn into_line_rejects_unknown_currency() {
        let mut record = record();
        record.currency = Some("XYZ".to_string());

        assert_eq!(
            record.into_line(BDT),
            Err(RecordError::UnknownCurrency("XYZ".to_string()))
        );
    }

    #[test]
    fn negative_quantity_restores_as_one() -> TestResult {
        let mut record = record();
        record.qty = -1;

        assert_eq!(record.into_line(BDT)?.qty(), 1);

        Ok(())
    }

    #[test]
    fn record_without_currency_uses_cart_currency() -> TestResult {
        let record: CartLineRecord = serde_json::from_str(
            r#"{"productId":"oil","name":"Soybean Oil","slug":"soybean-oil","price":160.0,"qty":1}"#,
        )?;

        let line = record.into_line(BDT)?;

        assert_eq!(line.price().currency(), BDT);

        Ok(())
    }

    #[test]
    fn serializes_with_camel_case_keys() -> TestResult {
        let json = serde_json::to_value(record())?;

        assert_eq!(json["productId"], "eggs-12");
        assert_eq!(json["price"], 150.0);

        Ok(())
    }
}
