use std::time::Duration;

use thiserror::Error;

/// Errors reported by a key-value store backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store is unreachable, rejected authentication, or failed the liveness check.
    #[error("Store connection failed: {0}")]
    ConnectionFailed(String),
    /// A get/set failed on an established connection.
    #[error("Store operation failed: {0}")]
    OperationFailed(String),
    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can cross the cart repository boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The stored bytes could not be turned back into a valid cart.
    #[error("Corrupt cart record for session {session_id}: {reason}")]
    CorruptRecord { session_id: String, reason: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A cart may only be saved under the session it is keyed by.
    #[error("Cart {cart_uuid} cannot be saved under session {session_id}")]
    KeyMismatch {
        session_id: String,
        cart_uuid: String,
    },
}
