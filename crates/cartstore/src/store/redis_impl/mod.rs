//! Redis store backend.
//!
//! Holds one managed connection per process: authenticated, with the
//! configured logical database selected, and checked with `PING` before use.

mod connector;
mod error;

pub use connector::{connection_url, RedisConnector};
