//! Key-value store backends.
//!
//! Concrete implementations of `cartstore_core::store::KeyValueStore`:
//!
//! - `redis_impl`: the production backend, one managed Redis connection per process
//! - `memory`: in-process map for tests and local runs
//! - `unavailable`: stands in for Redis when the service starts degraded

mod memory;
pub mod redis_impl;
mod retry;
mod unavailable;

pub use memory::MemoryStore;
pub use redis_impl::RedisConnector;
pub use retry::{retry_with_backoff, RetryConfig};
pub use unavailable::UnavailableStore;
