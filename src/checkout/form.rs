//! Checkout Form

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Default shipping country.
pub const DEFAULT_COUNTRY: &str = "Bangladesh";

/// Customer identity entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Full name
    pub name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,
}

/// Delivery address.
///
/// Division, district and upazila cascade: changing a division clears the
/// district and upazila, changing a district clears the upazila.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Country
    pub country: String,

    /// Division
    pub division: String,

    /// District
    pub district: String,

    /// Upazila (sub-district)
    pub upazila: String,

    /// Postal code, optional
    pub postal_code: Option<String>,

    /// Street and house details
    pub details_address: String,
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            division: String::new(),
            district: String::new(),
            upazila: String::new(),
            postal_code: None,
            details_address: String::new(),
        }
    }
}

impl ShippingAddress {
    /// Select a division, clearing district and upazila.
    pub fn set_division(&mut self, division: impl Into<String>) {
        self.division = division.into();
        self.district.clear();
        self.upazila.clear();
    }

    /// Select a district, clearing upazila.
    pub fn set_district(&mut self, district: impl Into<String>) {
        self.district = district.into();
        self.upazila.clear();
    }

    /// Select an upazila.
    pub fn set_upazila(&mut self, upazila: impl Into<String>) {
        self.upazila = upazila.into();
    }
}

/// A field that must be filled in before the order can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    /// Customer full name
    FullName,
    /// Customer email
    Email,
    /// Customer phone
    Phone,
    /// Address division
    Division,
    /// Address district
    District,
    /// Address upazila
    Upazila,
    /// Street and house details
    DetailsAddress,
}

impl Display for RequiredField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            RequiredField::FullName => "full name",
            RequiredField::Email => "email",
            RequiredField::Phone => "phone",
            RequiredField::Division => "division",
            RequiredField::District => "district",
            RequiredField::Upazila => "upazila",
            RequiredField::DetailsAddress => "detailed address",
        };

        f.write_str(name)
    }
}

/// Missing fields, in form order.
pub type MissingFields = SmallVec<[RequiredField; 7]>;

/// Everything the customer types in at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    /// Customer identity
    pub customer: Customer,

    /// Delivery address
    pub address: ShippingAddress,
}

impl CheckoutForm {
    /// Required fields that are empty after trimming.
    pub fn missing_fields(&self) -> MissingFields {
        let Self { customer, address } = self;

        [
            (RequiredField::FullName, &customer.name),
            (RequiredField::Email, &customer.email),
            (RequiredField::Phone, &customer.phone),
            (RequiredField::Division, &address.division),
            (RequiredField::District, &address.district),
            (RequiredField::Upazila, &address.upazila),
            (RequiredField::DetailsAddress, &address.details_address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Whether every required field is filled in.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Copy of the form with surrounding whitespace removed and an empty postal code dropped.
    pub fn trimmed(&self) -> Self {
        let trim = |value: &str| value.trim().to_string();

        Self {
            customer: Customer {
                name: trim(&self.customer.name),
                email: trim(&self.customer.email),
                phone: trim(&self.customer.phone),
            },
            address: ShippingAddress {
                country: trim(&self.address.country),
                division: trim(&self.address.division),
                district: trim(&self.address.district),
                upazila: trim(&self.address.upazila),
                postal_code: self
                    .address
                    .postal_code
                    .as_deref()
                    .map(str::trim)
                    .filter(|code| !code.is_empty())
                    .map(str::to_string),
                details_address: trim(&self.address.details_address),
            },
        }
    }
}
