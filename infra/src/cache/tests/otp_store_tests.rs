//! Unit tests for the Redis OTP store

use chrono::{Duration, Utc};

use ks_core::domain::entities::otp_record::{OtpRecord, DEFAULT_TTL_SECONDS};

use crate::cache::otp_store::{key_ttl_seconds, OtpStoreConfig, OTP_RECORD_KEY_PREFIX};
use crate::cache::CacheConfig;

#[test]
fn test_record_key_formatting() {
    let identity = "asha@example.in";
    let key = format!("{}:{}", OTP_RECORD_KEY_PREFIX, identity);
    assert_eq!(key, "otp:record:asha@example.in");

    let prefixed = CacheConfig::default().with_prefix("kaamsetu").make_key(&key);
    assert_eq!(prefixed, "kaamsetu:otp:record:asha@example.in");
}

#[test]
fn test_key_ttl_covers_record_lifetime_plus_retention() {
    let record = OtpRecord::issue(
        "asha@example.in".to_string(),
        "123456".to_string(),
        DEFAULT_TTL_SECONDS,
    );
    let ttl = key_ttl_seconds(&record, 3600);

    // Remaining lifetime is within a second of the full TTL
    assert!(ttl > (DEFAULT_TTL_SECONDS + 3600 - 2) as u64);
    assert!(ttl <= (DEFAULT_TTL_SECONDS + 3600) as u64);
}

#[test]
fn test_key_ttl_for_expired_record_is_retention_only() {
    let mut record = OtpRecord::issue("asha@example.in".to_string(), "123456".to_string(), 0);
    record.expires_at = Utc::now() - Duration::seconds(30);

    let ttl = key_ttl_seconds(&record, 3600);
    assert_eq!(ttl, 3600);
}

#[test]
fn test_key_ttl_never_reaches_zero() {
    let mut record = OtpRecord::issue("asha@example.in".to_string(), "123456".to_string(), 0);
    record.expires_at = Utc::now() - Duration::seconds(30);

    // SETEX rejects a zero TTL, so the floor must hold even without retention
    assert_eq!(key_ttl_seconds(&record, 0), 1);
}

#[test]
fn test_store_config_default_retention() {
    let config = OtpStoreConfig::default();
    assert_eq!(config.retention_seconds, 3600);
}
