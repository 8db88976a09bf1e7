//! Functional core for cartstore.
//!
//! Pure domain types, the store contract, and the conversions between them.
//! Nothing in this crate performs I/O; the `cartstore` binary provides the
//! store backends and the HTTP surface.

pub mod cart;
pub mod session;
pub mod store;
