//! Main OTP service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use constant_time_eq::constant_time_eq;

use ks_shared::utils::email::{is_valid_email, mask_email, normalize_email};
use ks_shared::utils::phone::{is_valid_mobile, mask_phone_number, normalize_phone_number};
use ks_shared::utils::validation::is_valid_otp_code;

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::{DomainError, DomainResult, OtpError, ValidationError};
use crate::repositories::OtpRepository;

use super::channels::{EmailChannel, SmsChannel};
use super::config::OtpServiceConfig;
use super::generator::CodeGenerator;
use super::types::{RequestCodeResult, VerifyCodeResult};

/// OTP service for issuing and verifying one-time codes
///
/// Each identity holds at most one active record. The service drives the
/// record through its lifecycle: issued by `request_code`, replaced in place
/// on resends, and closed out by `verify_code` or expiry.
pub struct OtpService<R, E, S>
where
    R: OtpRepository,
    E: EmailChannel,
    S: SmsChannel,
{
    /// Repository holding the per-identity OTP records
    repository: Arc<R>,
    /// Authoritative delivery channel
    email_channel: Arc<E>,
    /// Best-effort supplementary delivery channel
    sms_channel: Arc<S>,
    /// Code generator backed by the OS entropy source
    generator: CodeGenerator,
    /// Service configuration
    config: OtpServiceConfig,
}

impl<R, E, S> OtpService<R, E, S>
where
    R: OtpRepository,
    E: EmailChannel,
    S: SmsChannel,
{
    /// Create a new OTP service
    ///
    /// # Arguments
    ///
    /// * `repository` - OTP record store implementation
    /// * `email_channel` - Email delivery implementation
    /// * `sms_channel` - SMS delivery implementation
    /// * `config` - Service configuration
    pub fn new(
        repository: Arc<R>,
        email_channel: Arc<E>,
        sms_channel: Arc<S>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            repository,
            email_channel,
            sms_channel,
            generator: CodeGenerator::new(),
            config,
        }
    }

    /// Issue a one-time code for an identity and deliver it
    ///
    /// This method:
    /// 1. Normalizes and validates the identity
    /// 2. Enforces the resend interval and resend ceiling against any live record
    /// 3. Generates a new code and upserts the record (fresh episode or resend)
    /// 4. Sends the code over email, rolling the store back if delivery fails
    /// 5. Attempts SMS delivery within a bounded timeout when a phone is given
    ///
    /// # Arguments
    ///
    /// * `identity` - The email address to issue the code for
    /// * `phone` - Optional mobile number for supplementary SMS delivery
    ///
    /// # Returns
    ///
    /// * `Ok(RequestCodeResult)` - Issuance details and the resend window
    /// * `Err(DomainError)` - If validation, limits, storage or email delivery fail
    pub async fn request_code(
        &self,
        identity: &str,
        phone: Option<&str>,
    ) -> DomainResult<RequestCodeResult> {
        // Step 1: Normalize and validate the identity
        let identity = normalize_email(identity);
        if !is_valid_email(&identity) {
            return Err(OtpError::InvalidIdentity {
                identity: mask_email(&identity),
            }
            .into());
        }

        // Step 2: Inspect any existing record for this identity. A live record
        // continues its episode; a verified or expired one starts a new episode
        // with fresh counters.
        let existing = self
            .repository
            .find_by_identity(&identity)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to load OTP record: {}", e),
            })?;

        let (record, previous) = match existing {
            Some(rec) if !rec.verified && !rec.is_expired() => {
                let wait = rec.seconds_until_resend(self.config.min_resend_interval_seconds);
                if wait > 0 {
                    tracing::warn!(
                        identity = %mask_email(&identity),
                        retry_after_seconds = wait,
                        event = "rate_limit_exceeded",
                        "Code requested before the minimum resend interval elapsed"
                    );
                    return Err(OtpError::RateLimited {
                        retry_after_seconds: wait,
                    }
                    .into());
                }

                if rec.has_exhausted_resends(self.config.max_resends) {
                    tracing::warn!(
                        identity = %mask_email(&identity),
                        resend_count = rec.resend_count,
                        event = "resend_limit_exceeded",
                        "Resend allowance for the current episode is exhausted"
                    );
                    return Err(OtpError::ResendLimitExceeded {
                        max_resends: self.config.max_resends,
                    }
                    .into());
                }

                let mut updated = rec.clone();
                updated.reissue(self.generator.generate(), self.config.ttl_seconds);
                (updated, Some(rec))
            }
            _ => {
                let record = OtpRecord::issue(
                    identity.clone(),
                    self.generator.generate(),
                    self.config.ttl_seconds,
                );
                (record, None)
            }
        };

        // Step 3: Persist before delivery so a concurrent verify can only ever
        // observe a code that is also on its way to the user
        tracing::info!(
            identity = %mask_email(&identity),
            episode = %record.id,
            resend_count = record.resend_count,
            event = "otp_generated",
            "Generated verification code"
        );

        let stored = self
            .repository
            .upsert(record)
            .await
            .map_err(|e| {
                tracing::error!(
                    identity = %mask_email(&identity),
                    error = %e,
                    event = "otp_storage_failed",
                    "Failed to store verification code"
                );
                DomainError::Internal {
                    message: format!("Failed to store verification code: {}", e),
                }
            })?;

        // Step 4: Email is authoritative. On failure the upsert is rolled back
        // so the failed request burns neither the resend counter nor the
        // cooldown window.
        let message_id = match self.email_channel.send_code(&identity, &stored.code).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(
                    identity = %mask_email(&identity),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Email delivery failed, rolling back the issued code"
                );
                self.rollback_issue(&identity, previous).await;
                return Err(OtpError::DeliveryFailed { reason: e }.into());
            }
        };

        tracing::info!(
            identity = %mask_email(&identity),
            message_id = %message_id,
            event = "otp_email_sent",
            "Verification code dispatched over email"
        );

        // Step 5: SMS is best-effort and must never fail or stall the request
        let sms_dispatched = match phone {
            Some(phone) => self.send_sms_best_effort(phone, &stored.code).await,
            None => false,
        };

        let next_resend_at =
            Utc::now() + Duration::seconds(self.config.min_resend_interval_seconds);

        Ok(RequestCodeResult {
            identity,
            message_id,
            expires_at: stored.expires_at,
            next_resend_at,
            resend_count: stored.resend_count,
            sms_dispatched,
            code: if self.config.echo_code {
                Some(stored.code)
            } else {
                None
            },
        })
    }

    /// Verify a one-time code for an identity
    ///
    /// This method:
    /// 1. Normalizes the identity and shape-checks the code
    /// 2. Loads the identity's record and applies the terminal-state gates
    /// 3. Compares codes in constant time
    /// 4. Records a failed attempt on mismatch
    /// 5. Marks the record verified on match, which is terminal
    ///
    /// # Arguments
    ///
    /// * `identity` - The email address the code was issued for
    /// * `code` - The code to verify
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyCodeResult)` - The identity is now verified
    /// * `Err(DomainError)` - The specific reason verification was refused
    pub async fn verify_code(&self, identity: &str, code: &str) -> DomainResult<VerifyCodeResult> {
        // Step 1: Normalize the identity and shape-check the code. A malformed
        // code is a validation failure and does not burn an attempt.
        let identity = normalize_email(identity);

        if !is_valid_otp_code(code) {
            tracing::warn!(
                identity = %mask_email(&identity),
                code_length = code.len(),
                event = "invalid_code_format",
                "Malformed verification code provided"
            );
            return Err(ValidationError::InvalidFormat {
                field: "otp".to_string(),
            }
            .into());
        }

        // Step 2: Load the record and gate on its lifecycle state
        let record = self
            .repository
            .find_by_identity(&identity)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to load OTP record: {}", e),
            })?
            .ok_or_else(|| {
                tracing::warn!(
                    identity = %mask_email(&identity),
                    event = "otp_not_found",
                    "No pending verification for identity"
                );
                DomainError::Otp(OtpError::NotFound)
            })?;

        if record.verified {
            tracing::warn!(
                identity = %mask_email(&identity),
                event = "otp_replay_rejected",
                "Code already verified, replay rejected"
            );
            return Err(OtpError::AlreadyVerified.into());
        }

        if record.is_expired() {
            tracing::warn!(
                identity = %mask_email(&identity),
                event = "otp_expired",
                "Verification code has expired"
            );
            return Err(OtpError::Expired.into());
        }

        if record.has_exhausted_attempts(self.config.max_attempts) {
            tracing::warn!(
                identity = %mask_email(&identity),
                event = "max_attempts_exceeded",
                "Verification refused, attempt allowance already exhausted"
            );
            return Err(OtpError::TooManyAttempts.into());
        }

        // Step 3: Constant-time comparison to prevent timing attacks
        if !Self::constant_time_compare(&record.code, code) {
            let attempt_count = self
                .repository
                .record_failed_attempt(&identity)
                .await
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to record verification attempt: {}", e),
                })?;

            let remaining = self.config.max_attempts.saturating_sub(attempt_count);
            if remaining == 0 {
                tracing::error!(
                    identity = %mask_email(&identity),
                    event = "max_attempts_exceeded",
                    "Maximum verification attempts exceeded"
                );
                return Err(OtpError::TooManyAttempts.into());
            }

            tracing::warn!(
                identity = %mask_email(&identity),
                remaining_attempts = remaining,
                event = "otp_verification_failed",
                "Verification code mismatch"
            );
            return Err(OtpError::InvalidCode {
                remaining_attempts: remaining,
            }
            .into());
        }

        // Step 4: Mark verified. The record stays behind as a terminal
        // tombstone so replays are rejected deterministically.
        self.repository
            .mark_verified(&identity)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to mark verification complete: {}", e),
            })?;

        tracing::info!(
            identity = %mask_email(&identity),
            event = "otp_verified_success",
            "Verification code successfully verified"
        );

        Ok(VerifyCodeResult {
            identity,
            verified_at: Utc::now(),
        })
    }

    /// Attempt SMS delivery without letting it fail or stall the request
    ///
    /// The send is awaited only up to the configured timeout; failures and
    /// timeouts are logged and swallowed.
    async fn send_sms_best_effort(&self, phone: &str, code: &str) -> bool {
        let phone = normalize_phone_number(phone);
        if !is_valid_mobile(&phone) {
            tracing::warn!(
                phone = %mask_phone_number(&phone),
                event = "otp_sms_skipped",
                "Skipping SMS delivery for invalid mobile number"
            );
            return false;
        }

        match tokio::time::timeout(self.config.sms_timeout, self.sms_channel.send_code(&phone, code))
            .await
        {
            Ok(Ok(message_id)) => {
                tracing::info!(
                    phone = %mask_phone_number(&phone),
                    message_id = %message_id,
                    event = "otp_sms_sent",
                    "Verification code dispatched over SMS"
                );
                true
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    phone = %mask_phone_number(&phone),
                    error = %e,
                    event = "otp_sms_failed",
                    "SMS delivery failed, continuing without it"
                );
                false
            }
            Err(_) => {
                tracing::warn!(
                    phone = %mask_phone_number(&phone),
                    timeout_ms = self.config.sms_timeout.as_millis() as u64,
                    event = "otp_sms_timeout",
                    "SMS gateway did not answer in time, continuing without it"
                );
                false
            }
        }
    }

    /// Undo an upsert whose delivery failed
    ///
    /// A resend restores the previous record so the earlier code stays valid;
    /// a fresh issue is deleted outright.
    async fn rollback_issue(&self, identity: &str, previous: Option<OtpRecord>) {
        let result = match previous {
            Some(prev) => self.repository.upsert(prev).await.map(|_| ()),
            None => self.repository.delete(identity).await.map(|_| ()),
        };

        if let Err(e) = result {
            tracing::error!(
                identity = %mask_email(identity),
                error = %e,
                event = "otp_rollback_failed",
                "Failed to roll back OTP record after delivery failure"
            );
        }
    }

    /// Perform constant-time comparison of two OTP codes
    ///
    /// # Arguments
    ///
    /// * `code_a` - First code to compare
    /// * `code_b` - Second code to compare
    ///
    /// # Returns
    ///
    /// `true` if the codes match, `false` otherwise
    fn constant_time_compare(code_a: &str, code_b: &str) -> bool {
        if code_a.len() != code_b.len() {
            return false;
        }
        constant_time_eq(code_a.as_bytes(), code_b.as_bytes())
    }
}
