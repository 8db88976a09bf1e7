use std::{env, str::FromStr, time::Duration};

use crate::{repository::DegradePolicy, store::RetryConfig};

/// Connection parameters for the Redis cart store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    /// Logical database selected after connecting.
    pub db_index: i64,
    /// Upper bound for a single store call, connect included.
    pub timeout: Duration,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreSettings,
    /// Backoff used while establishing the store connection at startup.
    pub connect_retry: RetryConfig,
    /// What the cart repository does when the store fails.
    pub degrade_policy: DegradePolicy,
    /// Cookie carrying the session identifier (default: "session_id").
    pub session_cookie_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `REDIS_HOST` - Store host (default: "127.0.0.1")
    /// - `REDIS_PORT` - Store port (default: 6379)
    /// - `REDIS_PASSWORD` - Store password (default: none; empty means none)
    /// - `REDIS_DB` - Logical database index (default: 1)
    /// - `STORE_TIMEOUT_MS` - Per-call store timeout in milliseconds (default: 500)
    /// - `STORE_CONNECT_ATTEMPTS` - Connection attempts at startup (default: 3)
    /// - `CART_DEGRADE_POLICY` - `empty-cart` or `fail` (default: `empty-cart`)
    /// - `SESSION_COOKIE_NAME` - Session cookie name (default: "session_id")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let degrade_policy = match lookup("CART_DEGRADE_POLICY") {
            Some(value) => value.parse::<DegradePolicy>().unwrap_or_else(|_| {
                tracing::warn!(value = %value, "Unknown CART_DEGRADE_POLICY, using empty-cart");
                DegradePolicy::EmptyCart
            }),
            None => DegradePolicy::EmptyCart,
        };

        Self {
            store: StoreSettings {
                host: lookup("REDIS_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port: parse_var(&lookup, "REDIS_PORT").unwrap_or(6379),
                password: lookup("REDIS_PASSWORD").filter(|p| !p.is_empty()),
                db_index: parse_var(&lookup, "REDIS_DB").unwrap_or(1),
                timeout: Duration::from_millis(
                    parse_var(&lookup, "STORE_TIMEOUT_MS").unwrap_or(500),
                ),
            },
            connect_retry: RetryConfig {
                max_attempts: parse_var(&lookup, "STORE_CONNECT_ATTEMPTS").unwrap_or(3).max(1),
                ..RetryConfig::default()
            },
            degrade_policy,
            session_cookie_name: lookup("SESSION_COOKIE_NAME")
                .unwrap_or_else(|| "session_id".to_string()),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
