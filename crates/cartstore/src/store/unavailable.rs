use async_trait::async_trait;

use cartstore_core::store::{KeyValueStore, Result, StoreError};

/// Store used when the service starts without a working Redis connection.
///
/// Every call fails with the connection error observed at startup, so the
/// repository's degrade policy decides what callers see.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(cause: &StoreError) -> Self {
        Self {
            reason: cause.to_string(),
        }
    }

    fn error(&self) -> StoreError {
        StoreError::ConnectionFailed(self.reason.clone())
    }
}

#[async_trait]
impl KeyValueStore for UnavailableStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(self.error())
    }

    async fn set(&self, _key: &str, _value: &[u8]) -> Result<()> {
        Err(self.error())
    }

    async fn ping(&self) -> Result<()> {
        Err(self.error())
    }
}
