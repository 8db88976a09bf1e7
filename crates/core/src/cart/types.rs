use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CartError;
use crate::session::SessionId;

/// Decimal places a price may carry.
pub const MAX_PRICE_SCALE: u32 = 4;

/// Prices must stay below 10^11 so that, with [`MAX_PRICE_SCALE`] places, they
/// fit in the 15 significant digits a JSON number keeps exactly.
const PRICE_DIGITS_BEFORE_POINT: u32 = 11;

fn max_price() -> Decimal {
    Decimal::from_i128_with_scale(
        10_i128.pow(PRICE_DIGITS_BEFORE_POINT + MAX_PRICE_SCALE) - 1,
        MAX_PRICE_SCALE,
    )
}

/// The customer a cart belongs to, when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub uuid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Customer {
    /// Creates a customer reference with only its identifier.
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: None,
            email: None,
        }
    }

    /// Sets the customer's display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the customer's email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A single line item. Owned by exactly one [`Cart`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    uuid: String,
    product_uuid: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    quantity: u32,
}

impl CartItem {
    /// Creates a line item, rejecting empty ids, negative prices and zero quantities.
    pub fn new(
        uuid: impl Into<String>,
        product_uuid: impl Into<String>,
        price: Decimal,
        quantity: u32,
    ) -> Result<Self, CartError> {
        let item = Self {
            uuid: uuid.into(),
            product_uuid: product_uuid.into(),
            price,
            quantity,
        };
        item.validate()?;
        Ok(item)
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Reference to an external product. Not validated here.
    pub fn product_uuid(&self) -> &str {
        &self.product_uuid
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Checks the item invariants.
    pub fn validate(&self) -> Result<(), CartError> {
        if self.uuid.trim().is_empty() {
            return Err(CartError::EmptyItemUuid);
        }
        if self.price < Decimal::ZERO {
            return Err(CartError::NegativePrice(self.price.to_string()));
        }
        if self.price.normalize().scale() > MAX_PRICE_SCALE {
            return Err(CartError::PriceTooPrecise {
                price: self.price.to_string(),
                max: MAX_PRICE_SCALE,
            });
        }
        let max = max_price();
        if self.price > max {
            return Err(CartError::PriceTooLarge {
                price: self.price.to_string(),
                max: max.to_string(),
            });
        }
        if self.quantity == 0 {
            return Err(CartError::InvalidQuantity(self.quantity));
        }
        Ok(())
    }
}

/// A customer's in-progress order.
///
/// Items keep their insertion order. The only implicit mutation is
/// [`Cart::add_item`], which appends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    uuid: String,
    #[serde(default)]
    customer: Option<Customer>,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart. The uuid must not be empty.
    pub fn new(uuid: impl Into<String>) -> Result<Self, CartError> {
        let uuid = uuid.into();
        if uuid.trim().is_empty() {
            return Err(CartError::EmptyCartUuid);
        }
        Ok(Self {
            uuid,
            customer: None,
            payment_method: None,
            items: Vec::new(),
        })
    }

    /// Creates an empty cart keyed by a session.
    ///
    /// Infallible because a [`SessionId`] is never blank.
    pub fn for_session(session_id: &SessionId) -> Self {
        Self {
            uuid: session_id.as_str().to_string(),
            customer: None,
            payment_method: None,
            items: Vec::new(),
        }
    }

    /// Sets the customer for this cart.
    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }

    /// Sets the payment method for this cart.
    pub fn with_payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = Some(payment_method.into());
        self
    }

    /// Sets the initial items (useful for testing and fixtures).
    pub fn with_items(mut self, items: Vec<CartItem>) -> Self {
        self.items = items;
        self
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends an item to the end of the cart.
    pub fn add_item(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Removes the first item with the given uuid, keeping the order of the rest.
    pub fn remove_item(&mut self, item_uuid: &str) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.uuid == item_uuid)?;
        Some(self.items.remove(index))
    }

    /// Checks the cart and item invariants.
    ///
    /// Deserialization goes through serde's derive and skips the constructors,
    /// so stored records are validated with this after decoding.
    pub fn validate(&self) -> Result<(), CartError> {
        if self.uuid.trim().is_empty() {
            return Err(CartError::EmptyCartUuid);
        }
        self.items.iter().try_for_each(CartItem::validate)
    }
}
