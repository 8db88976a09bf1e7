use thiserror::Error;

/// Errors that can occur when constructing or validating a cart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("Cart uuid cannot be empty")]
    EmptyCartUuid,
    #[error("Cart item uuid cannot be empty")]
    EmptyItemUuid,
    #[error("Price cannot be negative: {0}")]
    NegativePrice(String),
    #[error("Price has more than {max} decimal places: {price}")]
    PriceTooPrecise { price: String, max: u32 },
    #[error("Price exceeds the maximum of {max}: {price}")]
    PriceTooLarge { price: String, max: String },
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),
}
