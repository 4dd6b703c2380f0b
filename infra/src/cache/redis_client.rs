//! Thin async Redis client underneath the OTP store.
//!
//! Clones share one multiplexed connection. Commands that fail with a
//! transient error are retried with doubling backoff; everything else
//! surfaces immediately as [`InfrastructureError::Cache`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::CacheConfig;
use crate::InfrastructureError;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 100;
const BACKOFF_CAP: Duration = Duration::from_secs(5);

type CommandFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis client shared by every store instance.
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    config: CacheConfig,
    max_attempts: u32,
    base_delay: Duration,
}

impl RedisClient {
    /// Connect using the default retry policy.
    ///
    /// # Example
    /// ```no_run
    /// # use ks_infra::cache::{CacheConfig, RedisClient};
    /// # async fn connect() -> Result<(), ks_infra::InfrastructureError> {
    /// let store_config = CacheConfig::new("redis://localhost:6379").with_prefix("kaamsetu");
    /// let redis = RedisClient::new(store_config).await?;
    /// redis.health_check().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        Self::with_retry(config, DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY_MS).await
    }

    /// Connect with an explicit retry policy.
    pub async fn with_retry(
        config: CacheConfig,
        max_attempts: u32,
        base_delay_ms: u64,
    ) -> Result<Self, InfrastructureError> {
        info!(
            url = %mask_url(&config.url),
            pool = config.max_connections,
            "Connecting to Redis"
        );

        let client = Client::open(config.url.as_str())
            .map_err(|e| InfrastructureError::Config(format!("Invalid Redis URL: {}", e)))?;

        let connect_timeout = Duration::from_secs(config.connection_timeout);
        let base_delay = Duration::from_millis(base_delay_ms);

        let mut attempt = 0;
        let mut delay = base_delay;
        let connection = loop {
            attempt += 1;
            match Self::open_connection(&client, connect_timeout).await {
                Ok(connection) => break connection,
                Err(e) if attempt < max_attempts => {
                    warn!(attempt, error = %e, "Redis connection failed, retrying");
                    sleep(delay).await;
                    delay = (delay * 2).min(BACKOFF_CAP);
                }
                Err(e) => {
                    error!(attempt, error = %e, "Giving up connecting to Redis");
                    return Err(e);
                }
            }
        };

        info!("Redis connection established");
        Ok(Self {
            connection,
            config,
            max_attempts,
            base_delay,
        })
    }

    async fn open_connection(
        client: &Client,
        timeout: Duration,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        match tokio::time::timeout(timeout, client.get_multiplexed_async_connection()).await {
            Ok(Ok(connection)) => Ok(connection),
            Ok(Err(e)) => Err(InfrastructureError::Cache(e)),
            Err(_) => Err(InfrastructureError::General(format!(
                "Redis connection timed out after {}s",
                timeout.as_secs()
            ))),
        }
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// SETEX: store a value that Redis expires on its own.
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        debug!(key, expiry_seconds, "SETEX");
        self.run("SETEX", |mut conn| {
            let key = key.to_owned();
            let value = value.to_owned();
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
    }

    /// GET: fetch a value, `None` when the key is absent or expired.
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!(key, "GET");
        self.run("GET", |mut conn| {
            let key = key.to_owned();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
    }

    /// DEL: remove a key, reporting whether it existed.
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!(key, "DEL");
        let removed: u32 = self
            .run("DEL", |mut conn| {
                let key = key.to_owned();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await?;
        Ok(removed > 0)
    }

    /// EXISTS: check for a key without fetching it.
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        self.run("EXISTS", |mut conn| {
            let key = key.to_owned();
            Box::pin(async move { conn.exists::<_, bool>(key).await })
        })
        .await
    }

    /// TTL: remaining lifetime of a key.
    ///
    /// Redis reports -1 for a key without expiry and -2 for a missing key;
    /// both collapse to `None` here.
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let remaining: i64 = self
            .run("TTL", |mut conn| {
                let key = key.to_owned();
                Box::pin(async move { conn.ttl::<_, i64>(key).await })
            })
            .await?;
        Ok((remaining >= 0).then_some(remaining))
    }

    /// PING: verify the connection end to end.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response: String = self
            .run("PING", |mut conn| {
                Box::pin(
                    async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await },
                )
            })
            .await?;
        if response != "PONG" {
            warn!(%response, "Unexpected PING reply");
        }
        Ok(response == "PONG")
    }

    /// Run one command, retrying transient failures with doubling backoff.
    async fn run<T, F>(&self, command: &str, operation: F) -> Result<T, InfrastructureError>
    where
        F: Fn(MultiplexedConnection) -> CommandFuture<T>,
    {
        let mut attempt = 0;
        let mut delay = self.base_delay;

        loop {
            attempt += 1;
            match operation(self.connection.clone()).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && is_retriable_error(&e) => {
                    warn!(command, attempt, error = %e, "Redis command failed, retrying");
                    sleep(delay).await;
                    delay = (delay * 2).min(BACKOFF_CAP);
                }
                Err(e) => {
                    error!(command, attempt, error = %e, "Redis command failed");
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }
}

/// Transient error kinds worth another attempt.
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials in a Redis URL before it reaches the logs.
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.find('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}****{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_owned(),
    }
}
