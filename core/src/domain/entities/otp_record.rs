//! OTP record entity for email/SMS identity verification.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of verification attempts allowed per code
pub const MAX_ATTEMPTS: u32 = 5;

/// Maximum number of resends allowed within one issuance episode
pub const MAX_RESENDS: u32 = 5;

/// Length of the one-time code
pub const CODE_LENGTH: usize = 6;

/// Default lifetime of a code in seconds (15 minutes)
pub const DEFAULT_TTL_SECONDS: i64 = 900;

/// Minimum interval between sends for the same identity, in seconds
pub const MIN_RESEND_INTERVAL_SECONDS: i64 = 60;

/// A single identity's pending (or completed) OTP verification.
///
/// One record exists per identity at a time. A record lives through one
/// "issuance episode": the first send creates it, resends replace the code
/// in place, and the episode ends when the record is verified or expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Unique identifier for this issuance episode
    pub id: Uuid,

    /// Normalized identity (lowercased email) this code was issued for
    pub identity: String,

    /// The current 6-digit code
    pub code: String,

    /// Number of failed verification attempts against the current code
    pub attempt_count: u32,

    /// Number of resends performed within this episode
    pub resend_count: u32,

    /// Timestamp of the most recent resend, if any
    pub last_resend_at: Option<DateTime<Utc>>,

    /// Timestamp when the episode started
    pub created_at: DateTime<Utc>,

    /// Timestamp when the current code expires
    pub expires_at: DateTime<Utc>,

    /// Whether the code has been successfully verified
    pub verified: bool,
}

impl OtpRecord {
    /// Starts a fresh issuance episode for an identity.
    ///
    /// # Arguments
    ///
    /// * `identity` - The normalized identity the code belongs to
    /// * `code` - The generated 6-digit code
    /// * `ttl_seconds` - Number of seconds until the code expires
    ///
    /// # Returns
    ///
    /// A new `OtpRecord` with all counters at zero
    pub fn issue(identity: String, code: String, ttl_seconds: i64) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            identity,
            code,
            attempt_count: 0,
            resend_count: 0,
            last_resend_at: None,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
            verified: false,
        }
    }

    /// Replaces the code within the current episode.
    ///
    /// The expiry window restarts from now, the resend counter advances and
    /// the attempt counter resets so the new code gets a full allowance.
    /// The episode identity and `created_at` are untouched.
    ///
    /// # Arguments
    ///
    /// * `code` - The freshly generated replacement code
    /// * `ttl_seconds` - Number of seconds until the new code expires
    pub fn reissue(&mut self, code: String, ttl_seconds: i64) {
        let now = Utc::now();
        self.code = code;
        self.attempt_count = 0;
        self.resend_count += 1;
        self.last_resend_at = Some(now);
        self.expires_at = now + Duration::seconds(ttl_seconds);
    }

    /// Checks whether the current code has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Checks whether the record can still accept a verification attempt.
    ///
    /// A record is verifiable if it has not expired, has not already been
    /// verified, and the attempt allowance is not exhausted.
    pub fn is_verifiable(&self) -> bool {
        !self.is_expired() && !self.verified && self.attempt_count < MAX_ATTEMPTS
    }

    /// Timestamp of the most recent send for this episode.
    ///
    /// This is the last resend when one happened, otherwise the initial send.
    pub fn last_sent_at(&self) -> DateTime<Utc> {
        self.last_resend_at.unwrap_or(self.created_at)
    }

    /// Seconds remaining until another send is allowed.
    ///
    /// # Arguments
    ///
    /// * `min_interval_seconds` - The configured minimum interval between sends
    ///
    /// # Returns
    ///
    /// Zero when a resend is already allowed, otherwise the wait in seconds
    pub fn seconds_until_resend(&self, min_interval_seconds: i64) -> i64 {
        let elapsed = (Utc::now() - self.last_sent_at()).num_seconds();
        (min_interval_seconds - elapsed).max(0)
    }

    /// Checks whether the resend allowance for this episode is exhausted
    ///
    /// # Arguments
    ///
    /// * `max_resends` - The configured resend ceiling
    pub fn has_exhausted_resends(&self, max_resends: u32) -> bool {
        self.resend_count >= max_resends
    }

    /// Checks whether the attempt allowance for the current code is exhausted
    ///
    /// # Arguments
    ///
    /// * `max_attempts` - The configured attempt ceiling
    pub fn has_exhausted_attempts(&self, max_attempts: u32) -> bool {
        self.attempt_count >= max_attempts
    }

    /// Records a failed verification attempt against the current code
    pub fn register_failed_attempt(&mut self) {
        self.attempt_count += 1;
    }

    /// Gets the number of remaining verification attempts
    ///
    /// # Arguments
    ///
    /// * `max_attempts` - The configured attempt ceiling
    ///
    /// # Returns
    ///
    /// The number of remaining attempts (0 if exceeded)
    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempt_count)
    }

    /// Marks the record as verified, ending the episode.
    ///
    /// A verified record is terminal: it cannot be reverified and a new
    /// episode must be started for any further verification.
    pub fn mark_verified(&mut self) {
        self.verified = true;
    }

    /// Gets the time remaining until expiration
    ///
    /// # Returns
    ///
    /// A `Duration` representing the time until expiration, or zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration as StdDuration;

    fn record() -> OtpRecord {
        OtpRecord::issue("asha@example.in".to_string(), "123456".to_string(), DEFAULT_TTL_SECONDS)
    }

    #[test]
    fn test_issue_starts_fresh_episode() {
        let rec = record();

        assert_eq!(rec.identity, "asha@example.in");
        assert_eq!(rec.code.len(), CODE_LENGTH);
        assert_eq!(rec.attempt_count, 0);
        assert_eq!(rec.resend_count, 0);
        assert!(rec.last_resend_at.is_none());
        assert!(!rec.verified);
        assert!(!rec.is_expired());
        assert!(rec.is_verifiable());
    }

    #[test]
    fn test_issue_custom_ttl() {
        let rec = OtpRecord::issue("asha@example.in".to_string(), "123456".to_string(), 120);

        let expected = rec.created_at + Duration::seconds(120);
        assert_eq!(rec.expires_at, expected);
    }

    #[test]
    fn test_reissue_replaces_code_and_restarts_window() {
        let mut rec = record();
        rec.register_failed_attempt();
        rec.register_failed_attempt();

        rec.reissue("654321".to_string(), DEFAULT_TTL_SECONDS);

        assert_eq!(rec.code, "654321");
        assert_eq!(rec.attempt_count, 0);
        assert_eq!(rec.resend_count, 1);
        assert!(rec.last_resend_at.is_some());
        assert!(rec.expires_at > rec.created_at + Duration::seconds(DEFAULT_TTL_SECONDS - 5));
    }

    #[test]
    fn test_reissue_is_monotonic_within_episode() {
        let mut rec = record();

        rec.reissue("111111".to_string(), DEFAULT_TTL_SECONDS);
        rec.reissue("222222".to_string(), DEFAULT_TTL_SECONDS);
        rec.reissue("333333".to_string(), DEFAULT_TTL_SECONDS);

        assert_eq!(rec.resend_count, 3);
        assert!(!rec.has_exhausted_resends(MAX_RESENDS));

        rec.reissue("444444".to_string(), DEFAULT_TTL_SECONDS);
        rec.reissue("555555".to_string(), DEFAULT_TTL_SECONDS);

        assert!(rec.has_exhausted_resends(MAX_RESENDS));
    }

    #[test]
    fn test_seconds_until_resend_counts_down_from_last_send() {
        let rec = record();

        let wait = rec.seconds_until_resend(MIN_RESEND_INTERVAL_SECONDS);
        assert!(wait > MIN_RESEND_INTERVAL_SECONDS - 5);
        assert!(wait <= MIN_RESEND_INTERVAL_SECONDS);
    }

    #[test]
    fn test_seconds_until_resend_zero_when_interval_elapsed() {
        let rec = record();

        assert_eq!(rec.seconds_until_resend(0), 0);
    }

    #[test]
    fn test_failed_attempts_accumulate() {
        let mut rec = record();

        rec.register_failed_attempt();
        assert_eq!(rec.attempt_count, 1);
        assert_eq!(rec.remaining_attempts(MAX_ATTEMPTS), MAX_ATTEMPTS - 1);

        rec.register_failed_attempt();
        assert_eq!(rec.remaining_attempts(MAX_ATTEMPTS), MAX_ATTEMPTS - 2);
    }

    #[test]
    fn test_attempt_exhaustion_blocks_verification() {
        let mut rec = record();

        for _ in 0..MAX_ATTEMPTS {
            rec.register_failed_attempt();
        }

        assert!(rec.has_exhausted_attempts(MAX_ATTEMPTS));
        assert_eq!(rec.remaining_attempts(MAX_ATTEMPTS), 0);
        assert!(!rec.is_verifiable());
    }

    #[test]
    fn test_mark_verified_is_terminal() {
        let mut rec = record();

        rec.mark_verified();

        assert!(rec.verified);
        assert!(!rec.is_verifiable());
    }

    #[test]
    fn test_is_expired() {
        let rec = OtpRecord::issue("asha@example.in".to_string(), "123456".to_string(), 0);

        thread::sleep(StdDuration::from_millis(10));

        assert!(rec.is_expired());
        assert!(!rec.is_verifiable());
    }

    #[test]
    fn test_time_until_expiration() {
        let rec = record();

        let remaining = rec.time_until_expiration();
        assert!(remaining <= Duration::seconds(DEFAULT_TTL_SECONDS));
        assert!(remaining > Duration::seconds(DEFAULT_TTL_SECONDS - 60));
    }

    #[test]
    fn test_time_until_expiration_zero_when_expired() {
        let rec = OtpRecord::issue("asha@example.in".to_string(), "123456".to_string(), 0);

        thread::sleep(StdDuration::from_millis(10));

        assert_eq!(rec.time_until_expiration(), Duration::zero());
    }

    #[test]
    fn test_serialization_round_trip() {
        let rec = record();

        let json = serde_json::to_string(&rec).unwrap();
        let deserialized: OtpRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(rec, deserialized);
    }
}
