//! Request-scoped context module.
//!
//! Provides the `CurrentSession` extractor that resolves the caller's session
//! identifier so handlers receive it as an explicit value.

mod extractor;

pub use extractor::{CurrentSession, SESSION_HEADER};
