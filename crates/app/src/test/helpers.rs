//! Test Helpers

use std::sync::Arc;

use jiff::Timestamp;
use rusty_money::{Money, iso::BDT, iso::Currency};

use grocer::{
    checkout::{Checkout, CheckoutForm, Customer, ShippingAddress},
    orders::{CheckoutOrderDraft, PaymentMethod},
    products::{Product, ProductId},
};

use crate::{
    last_order::LastOrderStore,
    storage::{KeyValueStorage, MemoryStorage},
    store::CartStore,
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

pub(crate) fn form() -> CheckoutForm {
    CheckoutForm {
        customer: Customer {
            name: "Tania Akter".to_string(),
            email: "tania@example.com".to_string(),
            phone: "01911000000".to_string(),
        },
        address: ShippingAddress {
            division: "Khulna".to_string(),
            district: "Jashore".to_string(),
            upazila: "Sharsha".to_string(),
            details_address: "Village Bagachra".to_string(),
            ..ShippingAddress::default()
        },
    }
}

/// Memory-backed stores sharing one storage.
pub(crate) struct Stores {
    pub(crate) storage: Arc<MemoryStorage>,
    pub(crate) cart: CartStore,
    pub(crate) last_order: LastOrderStore,
}

pub(crate) fn stores() -> Stores {
    let storage = Arc::new(MemoryStorage::new());
    let shared: Arc<dyn KeyValueStorage> = storage.clone();

    Stores {
        cart: CartStore::load(shared.clone(), BDT),
        last_order: LastOrderStore::new(shared),
        storage,
    }
}

/// Fill the cart with a ৳1,000 order and build its draft.
pub(crate) fn filled_cart_draft(
    cart: &CartStore,
    method: PaymentMethod,
) -> Result<CheckoutOrderDraft, Box<dyn std::error::Error>> {
    cart.add_to_cart(&product("rice", 420))?;
    cart.add_to_cart(&product("rice", 420))?;
    cart.add_to_cart(&product("oil", 160))?;

    let mut checkout = Checkout::with_form(form());
    checkout.set_payment_method(method);

    Ok(cart.with_cart(|cart| checkout.draft(cart))?)
}

pub(crate) fn placed_at() -> Timestamp {
    Timestamp::from_second(1_760_000_000).unwrap_or(Timestamp::UNIX_EPOCH)
}
