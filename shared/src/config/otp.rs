//! OTP issuance and verification configuration module

use serde::{Deserialize, Serialize};

/// One-time code policy knobs
///
/// A record expires `ttl_seconds` after its most recent issuance or resend.
/// Resends inside `min_resend_interval_seconds` are rejected, as is any
/// resend past `max_resends` for the current record. Failed verification
/// attempts are capped per record by `max_attempts`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Code lifetime from the most recent issuance, in seconds
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,

    /// Minimum gap between sends for one identity, in seconds
    #[serde(default = "default_resend_interval")]
    pub min_resend_interval_seconds: u64,

    /// Maximum resends per record
    #[serde(default = "default_max_resends")]
    pub max_resends: u32,

    /// Maximum failed verification attempts per record
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Upper bound on waiting for the best-effort SMS leg, in seconds
    #[serde(default = "default_sms_timeout")]
    pub sms_timeout_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            min_resend_interval_seconds: default_resend_interval(),
            max_resends: default_max_resends(),
            max_attempts: default_max_attempts(),
            sms_timeout_seconds: default_sms_timeout(),
        }
    }
}

impl OtpConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        fn var_or<T: std::str::FromStr>(name: &str, fallback: T) -> T {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback)
        }

        Self {
            ttl_seconds: var_or("OTP_TTL_SECONDS", default_ttl()),
            min_resend_interval_seconds: var_or(
                "OTP_MIN_RESEND_INTERVAL_SECONDS",
                default_resend_interval(),
            ),
            max_resends: var_or("OTP_MAX_RESENDS", default_max_resends()),
            max_attempts: var_or("OTP_MAX_ATTEMPTS", default_max_attempts()),
            sms_timeout_seconds: var_or("OTP_SMS_TIMEOUT_SECONDS", default_sms_timeout()),
        }
    }
}

fn default_ttl() -> u64 {
    900 // 15 minutes
}

fn default_resend_interval() -> u64 {
    60
}

fn default_max_resends() -> u32 {
    5
}

fn default_max_attempts() -> u32 {
    5
}

fn default_sms_timeout() -> u64 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_config_defaults() {
        let config = OtpConfig::default();
        assert_eq!(config.ttl_seconds, 900);
        assert_eq!(config.min_resend_interval_seconds, 60);
        assert_eq!(config.max_resends, 5);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.sms_timeout_seconds, 3);
    }
}
