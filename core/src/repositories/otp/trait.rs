//! OTP repository trait defining the interface for OTP record persistence.
//!
//! This module defines the repository pattern interface for OTP records,
//! following Domain-Driven Design principles. The trait is async-first and
//! uses Result types for proper error handling.

use async_trait::async_trait;

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::DomainError;

/// Repository trait for OTP record persistence operations
///
/// This trait defines the contract for data access operations on the single
/// active OTP record each identity may hold. Implementations must serialize
/// operations per identity: an `upsert` racing a `mark_verified` for the same
/// identity must never produce a torn record (old code with new expiry or the
/// reverse).
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use ks_core::repositories::OtpRepository;
/// use ks_core::domain::entities::otp_record::OtpRecord;
/// use ks_core::errors::DomainError;
///
/// struct InMemoryOtpStore {
///     // map keyed by identity, guarded per identity
/// }
///
/// #[async_trait]
/// impl OtpRepository for InMemoryOtpStore {
///     async fn upsert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
///         Ok(record)
///     }
///
///     async fn find_by_identity(&self, _identity: &str) -> Result<Option<OtpRecord>, DomainError> {
///         Ok(None)
///     }
///
///     async fn record_failed_attempt(&self, _identity: &str) -> Result<u32, DomainError> {
///         Ok(1)
///     }
///
///     async fn mark_verified(&self, _identity: &str) -> Result<(), DomainError> {
///         Ok(())
///     }
///
///     async fn delete(&self, _identity: &str) -> Result<bool, DomainError> {
///         Ok(false)
///     }
/// }
/// ```
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Insert or replace the OTP record for its identity
    ///
    /// The record's `identity` field is the storage key; any existing record
    /// for that identity is overwritten as a whole.
    ///
    /// # Arguments
    /// * `record` - The record to persist
    ///
    /// # Returns
    /// * `Ok(OtpRecord)` - The persisted record
    /// * `Err(DomainError)` - Storage error occurred
    ///
    /// # Example
    /// ```no_run
    /// # use ks_core::repositories::OtpRepository;
    /// # use ks_core::domain::entities::otp_record::OtpRecord;
    /// # async fn example(repo: &impl OtpRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let record = OtpRecord::issue("asha@example.in".to_string(), "123456".to_string(), 900);
    /// repo.upsert(record).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn upsert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError>;

    /// Find the active OTP record for an identity
    ///
    /// # Arguments
    /// * `identity` - The normalized identity (lowercased email)
    ///
    /// # Returns
    /// * `Ok(Some(OtpRecord))` - A record exists for the identity
    /// * `Ok(None)` - No record exists
    /// * `Err(DomainError)` - Storage error occurred
    ///
    /// # Example
    /// ```no_run
    /// # use ks_core::repositories::OtpRepository;
    /// # async fn example(repo: &impl OtpRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// match repo.find_by_identity("asha@example.in").await? {
    ///     Some(record) => println!("code expires at {}", record.expires_at),
    ///     None => println!("no pending verification"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn find_by_identity(&self, identity: &str) -> Result<Option<OtpRecord>, DomainError>;

    /// Record a failed verification attempt against the identity's record
    ///
    /// The increment happens inside the store's per-identity critical section
    /// so concurrent attempts cannot lose updates.
    ///
    /// # Arguments
    /// * `identity` - The normalized identity
    ///
    /// # Returns
    /// * `Ok(u32)` - The updated attempt count
    /// * `Err(DomainError::NotFound)` - No record exists for the identity
    /// * `Err(DomainError)` - Storage error occurred
    async fn record_failed_attempt(&self, identity: &str) -> Result<u32, DomainError>;

    /// Mark the identity's record as verified
    ///
    /// The record stays in the store as a terminal tombstone until it expires
    /// out, so replayed verification calls can be answered deterministically.
    ///
    /// # Arguments
    /// * `identity` - The normalized identity
    ///
    /// # Returns
    /// * `Ok(())` - The record was marked verified
    /// * `Err(DomainError::NotFound)` - No record exists for the identity
    /// * `Err(DomainError)` - Storage error occurred
    async fn mark_verified(&self, identity: &str) -> Result<(), DomainError>;

    /// Delete the identity's record
    ///
    /// Used to roll back an issuance whose delivery failed, and to clear
    /// records that are no longer needed.
    ///
    /// # Arguments
    /// * `identity` - The normalized identity
    ///
    /// # Returns
    /// * `Ok(true)` - A record existed and was removed
    /// * `Ok(false)` - No record existed
    /// * `Err(DomainError)` - Storage error occurred
    async fn delete(&self, identity: &str) -> Result<bool, DomainError>;
}
