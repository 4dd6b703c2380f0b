//! Configuration for the OTP service

use std::time::Duration;

use ks_shared::config::environment::OperatingMode;
use ks_shared::config::otp::OtpConfig;

use crate::domain::entities::otp_record::{
    DEFAULT_TTL_SECONDS, MAX_ATTEMPTS, MAX_RESENDS, MIN_RESEND_INTERVAL_SECONDS,
};

/// Configuration for the OTP service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Number of seconds before an issued code expires
    pub ttl_seconds: i64,
    /// Minimum seconds between sends for the same identity
    pub min_resend_interval_seconds: i64,
    /// Maximum number of resends within one issuance episode
    pub max_resends: u32,
    /// Maximum number of verification attempts per code
    pub max_attempts: u32,
    /// Upper bound on how long a best-effort SMS send may take
    pub sms_timeout: Duration,
    /// Whether to echo the issued code in results (non-production only)
    pub echo_code: bool,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            min_resend_interval_seconds: MIN_RESEND_INTERVAL_SECONDS,
            max_resends: MAX_RESENDS,
            max_attempts: MAX_ATTEMPTS,
            sms_timeout: Duration::from_secs(3),
            echo_code: false,
        }
    }
}

impl OtpServiceConfig {
    /// Build a service configuration from application settings.
    ///
    /// Code echoing is tied to the operating mode and can never be switched
    /// on in production.
    pub fn from_settings(otp: &OtpConfig, mode: OperatingMode) -> Self {
        Self {
            ttl_seconds: otp.ttl_seconds as i64,
            min_resend_interval_seconds: otp.min_resend_interval_seconds as i64,
            max_resends: otp.max_resends,
            max_attempts: otp.max_attempts,
            sms_timeout: Duration::from_secs(otp.sms_timeout_seconds),
            echo_code: mode.is_development(),
        }
    }
}
