use rusty_money::{Money, iso::BDT, iso::Currency};

use crate::{
    checkout::form::{CheckoutForm, Customer, DEFAULT_COUNTRY, ShippingAddress},
    products::{Product, ProductId},
};

pub(crate) fn taka(amount: i64) -> Money<'static, Currency> {
    Money::from_minor(amount * 100, BDT)
}

pub(crate) fn product(id: &str, price: i64) -> Product {
    Product {
        id: ProductId::from(id),
        name: format!("Product {id}"),
        slug: id.to_string(),
        image: format!("https://cdn.example.com/{id}.png"),
        price: taka(price),
    }
}

pub(crate) fn complete_form() -> CheckoutForm {
    CheckoutForm {
        customer: Customer {
            name: "Nusrat Jahan".to_string(),
            email: "nusrat@example.com".to_string(),
            phone: "01711000000".to_string(),
        },
        address: ShippingAddress {
            country: DEFAULT_COUNTRY.to_string(),
            division: "Dhaka".to_string(),
            district: "Dhaka".to_string(),
            upazila: "Savar".to_string(),
            postal_code: Some("1340".to_string()),
            details_address: "House 12, Road 3".to_string(),
        },
    }
}
