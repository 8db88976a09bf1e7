//! API request types for cart operations.
//!
//! Pure data types with no I/O, shared by the handlers and their tests.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::CartError;
use super::types::CartItem;

/// Request payload for appending an item to the session's cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    /// Item id; generated when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub product_uuid: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

impl AddItemRequest {
    /// Create a request for a product with a generated item id.
    pub fn new(product_uuid: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            uuid: None,
            product_uuid: product_uuid.into(),
            price,
            quantity,
        }
    }

    /// Set an explicit item id.
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    /// Convert into a validated cart item.
    pub fn into_item(self) -> Result<CartItem, CartError> {
        let uuid = self.uuid.unwrap_or_else(|| Uuid::new_v4().to_string());
        CartItem::new(uuid, self.product_uuid, self.price, self.quantity)
    }
}
