//! Redis connection settings.
//!
//! Redis backs the OTP store; the key TTL doubles as garbage collection for
//! stale unverified records, so no scheduled cleanup job exists.

use serde::{Deserialize, Serialize};

const DEFAULT_URL: &str = "redis://localhost:6379";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Connection settings for the Redis instance behind the OTP store.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Connection URL, `redis://` or `rediss://`
    pub url: String,

    /// Maximum number of pooled connections
    pub max_connections: u32,

    /// Connect timeout in seconds
    pub connection_timeout: u64,

    /// Prefix prepended to every key, separating deployments that share an
    /// instance
    pub key_prefix: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            max_connections: DEFAULT_POOL_SIZE,
            connection_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            key_prefix: None,
        }
    }
}

impl CacheConfig {
    /// Configuration pointing at the given URL, other settings at defaults.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Read settings from `REDIS_URL`, `REDIS_MAX_CONNECTIONS` and
    /// `REDIS_KEY_PREFIX`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("REDIS_URL") {
            config.url = url;
        }
        if let Some(size) = std::env::var("REDIS_MAX_CONNECTIONS")
            .ok()
            .and_then(|value| value.parse().ok())
        {
            config.max_connections = size;
        }
        if let Ok(prefix) = std::env::var("REDIS_KEY_PREFIX") {
            if !prefix.is_empty() {
                config.key_prefix = Some(prefix);
            }
        }
        config
    }

    /// Builder-style setter for the key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Apply the configured prefix to a key.
    pub fn make_key(&self, key: &str) -> String {
        match self.key_prefix.as_deref() {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_owned(),
        }
    }
}
