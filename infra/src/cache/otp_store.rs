//! Redis-backed OTP record store
//!
//! Persists each identity's single active OTP record as JSON and implements
//! the core repository contract on top of the Redis client. All operations
//! for one identity are serialized through a per-identity async lock, so a
//! read-modify-write can never interleave with another writer for the same
//! identity.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use ks_core::domain::entities::otp_record::OtpRecord;
use ks_core::errors::DomainError;
use ks_core::repositories::OtpRepository;
use ks_shared::utils::mask_email;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Key prefix for stored OTP records
pub(crate) const OTP_RECORD_KEY_PREFIX: &str = "otp:record";

/// Number of lock registry entries that triggers pruning
const LOCK_REGISTRY_PRUNE_THRESHOLD: usize = 1024;

/// Tuning knobs for the Redis OTP store
#[derive(Debug, Clone)]
pub struct OtpStoreConfig {
    /// Seconds a record stays readable past its logical expiry.
    ///
    /// The Redis key TTL is the record's remaining lifetime plus this
    /// retention, so an expired record still answers verification calls
    /// with an expiry outcome before the key is garbage collected.
    pub retention_seconds: i64,
}

impl Default for OtpStoreConfig {
    fn default() -> Self {
        Self {
            retention_seconds: 3600,
        }
    }
}

/// Redis-backed implementation of the OTP repository
///
/// Records are stored whole under one key per identity, and a replaced
/// record overwrites the previous one in a single SETEX. The per-identity
/// lock covers every repository method, which keeps increment operations
/// and whole-record writes from tearing each other.
pub struct RedisOtpStore {
    client: RedisClient,
    config: OtpStoreConfig,
    /// Per-identity locks serializing record operations
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RedisOtpStore {
    /// Create a store with default retention
    pub fn new(client: RedisClient) -> Self {
        Self::with_config(client, OtpStoreConfig::default())
    }

    /// Create a store with explicit retention configuration
    pub fn with_config(client: RedisClient, config: OtpStoreConfig) -> Self {
        Self {
            client,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Storage key for an identity's record
    fn record_key(&self, identity: &str) -> String {
        self.client
            .config()
            .make_key(&format!("{}:{}", OTP_RECORD_KEY_PREFIX, identity))
    }

    /// Fetch the lock guarding an identity's record
    ///
    /// Uncontended entries are pruned once the registry grows past the
    /// threshold, keeping the map bounded by the number of in-flight
    /// identities.
    async fn identity_lock(&self, identity: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        if locks.len() > LOCK_REGISTRY_PRUNE_THRESHOLD {
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        locks
            .entry(identity.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Read and decode the record for an identity, if present
    async fn read_record(&self, identity: &str) -> Result<Option<OtpRecord>, DomainError> {
        let key = self.record_key(identity);
        let payload = self.client.get(&key).await.map_err(storage_error)?;

        match payload {
            Some(json) => serde_json::from_str::<OtpRecord>(&json).map(Some).map_err(|e| {
                warn!(
                    identity = %mask_email(identity),
                    "Stored OTP record is not decodable: {}", e
                );
                DomainError::Internal {
                    message: format!("Failed to decode stored OTP record: {}", e),
                }
            }),
            None => Ok(None),
        }
    }

    /// Encode and write a record under its identity key
    async fn write_record(&self, record: &OtpRecord) -> Result<(), DomainError> {
        let key = self.record_key(&record.identity);
        let payload = serde_json::to_string(record).map_err(|e| DomainError::Internal {
            message: format!("Failed to encode OTP record: {}", e),
        })?;
        let ttl = key_ttl_seconds(record, self.config.retention_seconds);

        self.client
            .set_with_expiry(&key, &payload, ttl)
            .await
            .map_err(storage_error)
    }
}

/// Redis key TTL for a record
///
/// The key outlives the logical expiry by the configured retention, so the
/// store can distinguish an expired code from one that never existed.
pub(crate) fn key_ttl_seconds(record: &OtpRecord, retention_seconds: i64) -> u64 {
    let remaining = record.time_until_expiration().num_seconds();
    (remaining + retention_seconds).max(1) as u64
}

/// Map a client failure into the domain error the repository contract uses
fn storage_error(e: InfrastructureError) -> DomainError {
    DomainError::Internal {
        message: format!("OTP store unavailable: {}", e),
    }
}

#[async_trait]
impl OtpRepository for RedisOtpStore {
    async fn upsert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        let lock = self.identity_lock(&record.identity).await;
        let _guard = lock.lock().await;

        self.write_record(&record).await?;
        debug!(
            identity = %mask_email(&record.identity),
            episode = %record.id,
            "Stored OTP record"
        );
        Ok(record)
    }

    async fn find_by_identity(&self, identity: &str) -> Result<Option<OtpRecord>, DomainError> {
        let lock = self.identity_lock(identity).await;
        let _guard = lock.lock().await;

        self.read_record(identity).await
    }

    async fn record_failed_attempt(&self, identity: &str) -> Result<u32, DomainError> {
        let lock = self.identity_lock(identity).await;
        let _guard = lock.lock().await;

        let mut record = self
            .read_record(identity)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "OtpRecord".to_string(),
            })?;

        record.register_failed_attempt();
        self.write_record(&record).await?;
        Ok(record.attempt_count)
    }

    async fn mark_verified(&self, identity: &str) -> Result<(), DomainError> {
        let lock = self.identity_lock(identity).await;
        let _guard = lock.lock().await;

        let mut record = self
            .read_record(identity)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "OtpRecord".to_string(),
            })?;

        record.mark_verified();
        self.write_record(&record).await?;
        debug!(identity = %mask_email(identity), "Marked OTP record verified");
        Ok(())
    }

    async fn delete(&self, identity: &str) -> Result<bool, DomainError> {
        let lock = self.identity_lock(identity).await;
        let _guard = lock.lock().await;

        let key = self.record_key(identity);
        self.client.delete(&key).await.map_err(storage_error)
    }
}
