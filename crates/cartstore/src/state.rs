//! Application state shared by all request handlers.

use std::sync::Arc;

use cartstore_core::store::KeyValueStore;

use crate::{config::Config, repository::CartRepository, store::MemoryStore};

/// Shared application state.
///
/// Cloned for each request handler; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Cart repository over the configured store.
    pub carts: Arc<CartRepository>,
    /// The store itself, for readiness checks.
    pub store: Arc<dyn KeyValueStore>,
    /// Cookie carrying the session identifier.
    pub session_cookie_name: Arc<str>,
}

impl AppState {
    /// Creates the state for the given store and configuration.
    pub fn new(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self::with_repository(
            CartRepository::new(store.clone(), config.degrade_policy),
            store,
            config,
        )
    }

    /// Creates the state around an already configured repository.
    pub fn with_repository(
        carts: CartRepository,
        store: Arc<dyn KeyValueStore>,
        config: &Config,
    ) -> Self {
        Self {
            carts: Arc::new(carts),
            store,
            session_cookie_name: Arc::from(config.session_cookie_name.as_str()),
        }
    }
}

impl Default for AppState {
    /// In-memory store with default configuration.
    fn default() -> Self {
        Self::new(Arc::new(MemoryStore::new()), &Config::default())
    }
}
