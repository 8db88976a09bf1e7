//! Redis error mapping to StoreError.

use std::time::Duration;

use cartstore_core::store::StoreError;

/// Maps Redis errors raised by an established connection.
///
/// Client-side timeouts carry the configured per-call `timeout`.
pub fn map_redis_error(err: redis::RedisError, timeout: Duration) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout(timeout)
    } else if err.is_connection_refusal() || err.is_connection_dropped() {
        StoreError::ConnectionFailed(err.to_string())
    } else {
        StoreError::OperationFailed(err.to_string())
    }
}

/// Maps Redis errors raised while connecting, authenticating or selecting the database.
pub fn map_connect_error(err: redis::RedisError) -> StoreError {
    StoreError::ConnectionFailed(err.to_string())
}
