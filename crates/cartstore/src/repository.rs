//! Session-keyed cart repository.
//!
//! Maps a session id to the serialized cart stored under it. Store failures
//! are reported once per call and then handled according to the configured
//! [`DegradePolicy`].

use std::str::FromStr;
use std::sync::Arc;

use cartstore_core::cart::Cart;
use cartstore_core::session::SessionId;
use cartstore_core::store::{
    deserialize_cart, serialize_cart, KeyValueStore, RepositoryError, StoreError,
};

/// What the repository does when the store itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegradePolicy {
    /// Reads yield an empty cart for the session and writes are dropped.
    #[default]
    EmptyCart,
    /// Store errors are returned to the caller.
    Fail,
}

impl FromStr for DegradePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty-cart" | "empty_cart" | "empty" => Ok(Self::EmptyCart),
            "fail" | "error" => Ok(Self::Fail),
            other => Err(format!("unknown degrade policy: {other}")),
        }
    }
}

/// Receives store failures observed by the repository.
pub trait FailureReporter: Send + Sync {
    fn report(&self, message: &str, error: &StoreError);
}

/// Reports failures through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, message: &str, error: &StoreError) {
        tracing::error!(error = %error, "{message}");
    }
}

pub struct CartRepository {
    store: Arc<dyn KeyValueStore>,
    policy: DegradePolicy,
    reporter: Arc<dyn FailureReporter>,
}

impl CartRepository {
    /// Creates a repository over `store` that reports failures through `tracing`.
    pub fn new(store: Arc<dyn KeyValueStore>, policy: DegradePolicy) -> Self {
        Self {
            store,
            policy,
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Replaces the failure reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn policy(&self) -> DegradePolicy {
        self.policy
    }

    /// Loads the cart stored for a session.
    ///
    /// `Ok(None)` means the session has no cart yet. Under
    /// [`DegradePolicy::EmptyCart`] a store failure yields an empty cart keyed by
    /// the session instead of an error. A record that cannot be decoded is always
    /// [`RepositoryError::CorruptRecord`].
    pub async fn get_cart(&self, session_id: &SessionId) -> Result<Option<Cart>, RepositoryError> {
        match self.fetch(session_id).await {
            Err(RepositoryError::Store(_)) if self.policy == DegradePolicy::EmptyCart => {
                tracing::warn!(
                    session_id = %session_id,
                    "Serving empty cart, store unavailable"
                );
                Ok(Some(Cart::for_session(session_id)))
            }
            result => result,
        }
    }

    /// Loads the cart a caller is about to modify and save back.
    ///
    /// Store failures are always returned, whatever the policy, so a degraded
    /// empty cart never replaces the stored one.
    pub async fn load_for_update(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Cart>, RepositoryError> {
        self.fetch(session_id).await
    }

    /// Stores the cart under the session, overwriting any previous record.
    ///
    /// The cart must be keyed by the same session. Under
    /// [`DegradePolicy::EmptyCart`] a store failure is reported and dropped.
    pub async fn save_cart(
        &self,
        session_id: &SessionId,
        cart: &Cart,
    ) -> Result<(), RepositoryError> {
        match self.write(session_id, cart).await {
            Err(RepositoryError::Store(_)) if self.policy == DegradePolicy::EmptyCart => Ok(()),
            result => result,
        }
    }

    /// Stores a cart loaded through [`CartRepository::load_for_update`].
    ///
    /// Like [`CartRepository::save_cart`], but store failures are always returned.
    pub async fn store_update(
        &self,
        session_id: &SessionId,
        cart: &Cart,
    ) -> Result<(), RepositoryError> {
        self.write(session_id, cart).await
    }

    async fn fetch(&self, session_id: &SessionId) -> Result<Option<Cart>, RepositoryError> {
        let bytes = match self.store.get(session_id.as_str()).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.reporter.report("Failed to load cart", &err);
                return Err(err.into());
            }
        };

        let Some(bytes) = bytes else {
            tracing::debug!(session_id = %session_id, "No cart stored for session");
            return Ok(None);
        };

        match deserialize_cart(&bytes) {
            Ok(cart) => {
                tracing::trace!(
                    session_id = %session_id,
                    items = cart.items().len(),
                    "Loaded cart"
                );
                Ok(Some(cart))
            }
            Err(err) => {
                tracing::warn!(session_id = %session_id, error = %err, "Stored cart is corrupt");
                Err(RepositoryError::CorruptRecord {
                    session_id: session_id.to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }

    async fn write(&self, session_id: &SessionId, cart: &Cart) -> Result<(), RepositoryError> {
        if cart.uuid() != session_id.as_str() {
            return Err(RepositoryError::KeyMismatch {
                session_id: session_id.to_string(),
                cart_uuid: cart.uuid().to_string(),
            });
        }

        let bytes =
            serialize_cart(cart).map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        match self.store.set(session_id.as_str(), &bytes).await {
            Ok(()) => {
                tracing::debug!(
                    session_id = %session_id,
                    items = cart.items().len(),
                    "Saved cart"
                );
                Ok(())
            }
            Err(err) => {
                self.reporter.report("Failed to save cart", &err);
                Err(err.into())
            }
        }
    }
}
