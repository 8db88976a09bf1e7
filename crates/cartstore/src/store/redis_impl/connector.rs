//! Redis connector.
//!
//! `ConnectionManager` multiplexes one connection across all requests and
//! reconnects on its own after the initial handshake, so a clone of it is all
//! each call needs.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};

use cartstore_core::store::{KeyValueStore, Result, StoreError};

use super::error::{map_connect_error, map_redis_error};
use crate::config::StoreSettings;
use crate::store::{retry_with_backoff, RetryConfig};

/// Builds the Redis URL for the given settings.
///
/// The password is percent-encoded and the database index becomes the path,
/// so the client authenticates and runs `SELECT` on every (re)connect.
pub fn connection_url(settings: &StoreSettings) -> String {
    match &settings.password {
        Some(password) => format!(
            "redis://:{}@{}:{}/{}",
            urlencoding::encode(password),
            settings.host,
            settings.port,
            settings.db_index
        ),
        None => format!(
            "redis://{}:{}/{}",
            settings.host, settings.port, settings.db_index
        ),
    }
}

/// The process-wide connection to the Redis cart store.
#[derive(Clone)]
pub struct RedisConnector {
    conn: ConnectionManager,
    timeout: Duration,
}

impl std::fmt::Debug for RedisConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConnector")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RedisConnector {
    /// Opens the connection, authenticates, selects the database and checks liveness.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ConnectionFailed` when the store is unreachable, rejects
    /// the password, or does not answer `PING` with `PONG`, and `StoreError::Timeout`
    /// when the handshake exceeds the configured timeout.
    pub async fn connect(settings: &StoreSettings) -> Result<Self> {
        let url = connection_url(settings);
        let client = redis::Client::open(url.as_str()).map_err(map_connect_error)?;

        let conn = tokio::time::timeout(settings.timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| StoreError::Timeout(settings.timeout))?
            .map_err(map_connect_error)?;

        let connector = Self {
            conn,
            timeout: settings.timeout,
        };
        connector.handshake().await?;

        tracing::info!(
            host = %settings.host,
            port = settings.port,
            db = settings.db_index,
            "Connected to Redis"
        );

        Ok(connector)
    }

    /// Calls [`RedisConnector::connect`] with exponential backoff between attempts.
    pub async fn connect_with_retry(settings: &StoreSettings, retry: &RetryConfig) -> Result<Self> {
        retry_with_backoff(retry, |attempt| {
            tracing::debug!(
                attempt,
                host = %settings.host,
                port = settings.port,
                "Connecting to Redis"
            );
            Self::connect(settings)
        })
        .await
    }

    /// A failed liveness check at connect time is a connection failure.
    async fn handshake(&self) -> Result<()> {
        self.pong().await.map_err(|err| match err {
            StoreError::OperationFailed(reason) => StoreError::ConnectionFailed(reason),
            other => other,
        })
    }

    async fn pong(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let reply: String = self.call(redis::cmd("PING").query_async(&mut conn)).await?;

        if reply.eq_ignore_ascii_case("PONG") {
            Ok(())
        } else {
            Err(StoreError::OperationFailed(format!(
                "unexpected PING reply: {reply}"
            )))
        }
    }

    /// Runs one Redis call under the per-call timeout.
    async fn call<T>(&self, fut: impl Future<Output = RedisResult<T>>) -> Result<T> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
            .map_err(|err| map_redis_error(err, self.timeout))
    }
}

#[async_trait]
impl KeyValueStore for RedisConnector {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = self.call(conn.get(key)).await?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        self.call(conn.set::<_, _, ()>(key, value)).await
    }

    async fn ping(&self) -> Result<()> {
        self.pong().await
    }
}
