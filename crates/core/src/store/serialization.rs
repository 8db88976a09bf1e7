//! Pure functions for serializing carts to and from store bytes.
//!
//! Records are JSON so they stay readable with `redis-cli GET`.

use thiserror::Error;

use crate::cart::Cart;

/// Errors that can occur during cart serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
    /// The bytes decoded but the cart breaks a domain invariant.
    #[error("Invalid cart: {0}")]
    InvalidCart(String),
}

/// Serializes a cart to JSON bytes.
pub fn serialize_cart(cart: &Cart) -> Result<Vec<u8>, SerializationError> {
    serde_json::to_vec(cart).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a cart and checks its invariants.
pub fn deserialize_cart(bytes: &[u8]) -> Result<Cart, SerializationError> {
    let cart: Cart = serde_json::from_slice(bytes)
        .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))?;
    cart.validate()
        .map_err(|e| SerializationError::InvalidCart(e.to_string()))?;
    Ok(cart)
}
