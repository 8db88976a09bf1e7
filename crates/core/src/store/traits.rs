use async_trait::async_trait;

use super::Result;

/// The narrow contract the cart repository needs from a key-value backend.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Gets the raw value stored under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Verifies the backend answers.
    async fn ping(&self) -> Result<()>;
}
