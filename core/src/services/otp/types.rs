//! Types for OTP service results

use chrono::{DateTime, Utc};

/// Result of requesting a one-time code
#[derive(Debug, Clone)]
pub struct RequestCodeResult {
    /// The normalized identity the code was issued for
    pub identity: String,
    /// The email provider message id
    pub message_id: String,
    /// When the issued code expires
    pub expires_at: DateTime<Utc>,
    /// When the caller may request another code
    pub next_resend_at: DateTime<Utc>,
    /// Number of resends performed within the current episode
    pub resend_count: u32,
    /// Whether the supplementary SMS was handed to the gateway in time
    pub sms_dispatched: bool,
    /// The issued code, present only when code echoing is enabled
    pub code: Option<String>,
}

/// Result of verifying a code
#[derive(Debug, Clone)]
pub struct VerifyCodeResult {
    /// The normalized identity that was verified
    pub identity: String,
    /// When the verification completed
    pub verified_at: DateTime<Utc>,
}
