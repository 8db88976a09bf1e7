//! Pure functions for mapping repository errors to HTTP status codes.

use super::{RepositoryError, StoreError};

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `Store(ConnectionFailed | Timeout)` -> 503 (Service Unavailable)
/// - `Store(OperationFailed)` -> 502 (Bad Gateway)
/// - `CorruptRecord` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `KeyMismatch` -> 409 (Conflict)
///
/// # Examples
///
/// ```
/// use cartstore_core::store::{repository_error_to_status_code, RepositoryError, StoreError};
///
/// let error = RepositoryError::Store(StoreError::ConnectionFailed("refused".to_string()));
/// assert_eq!(repository_error_to_status_code(&error), 503);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::Store(StoreError::ConnectionFailed(_) | StoreError::Timeout(_)) => 503,
        RepositoryError::Store(StoreError::OperationFailed(_)) => 502,
        RepositoryError::CorruptRecord { .. } => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::KeyMismatch { .. } => 409,
    }
}
