//! Mock implementation of OtpRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::DomainError;

use super::trait_::OtpRepository;

/// Mock OTP repository for testing
///
/// Keeps records in a process-local map keyed by identity. The map lock gives
/// the same per-identity mutual exclusion the real store provides.
pub struct MockOtpRepository {
    records: Arc<RwLock<HashMap<String, OtpRecord>>>,
}

impl MockOtpRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Read back a stored record without going through the trait
    pub async fn stored_record(&self, identity: &str) -> Option<OtpRecord> {
        let records = self.records.read().await;
        records.get(identity).cloned()
    }
}

impl Default for MockOtpRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpRepository for MockOtpRepository {
    async fn upsert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        let mut records = self.records.write().await;
        records.insert(record.identity.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_identity(&self, identity: &str) -> Result<Option<OtpRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(identity).cloned())
    }

    async fn record_failed_attempt(&self, identity: &str) -> Result<u32, DomainError> {
        let mut records = self.records.write().await;

        let record = records.get_mut(identity).ok_or(DomainError::NotFound {
            resource: "OtpRecord".to_string(),
        })?;

        record.register_failed_attempt();
        Ok(record.attempt_count)
    }

    async fn mark_verified(&self, identity: &str) -> Result<(), DomainError> {
        let mut records = self.records.write().await;

        let record = records.get_mut(identity).ok_or(DomainError::NotFound {
            resource: "OtpRecord".to_string(),
        })?;

        record.mark_verified();
        Ok(())
    }

    async fn delete(&self, identity: &str) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        Ok(records.remove(identity).is_some())
    }
}
