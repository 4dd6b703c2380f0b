use serde::{Deserialize, Serialize};
use validator::Validate;

use ks_core::domain::value_objects::SessionTokens;

/// Request body for issuing a registration code
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Email address the code is issued for
    #[validate(email)]
    pub email: String,

    /// Optional mobile number for the supplementary SMS copy
    /// Examples: "9876543210" or "+919876543210"
    #[validate(length(min = 10, max = 15))]
    #[serde(default)]
    pub phone: Option<String>,
}

/// Request body for issuing a login code
///
/// The password is optional; when present it is checked against the portal's
/// account store before any code is issued.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginSendOtpRequest {
    /// Email address the account is keyed by
    #[validate(email)]
    pub email: String,

    /// Optional password for the up-front credential check
    #[serde(default)]
    pub password: Option<String>,

    /// Optional mobile number for the supplementary SMS copy
    #[validate(length(min = 10, max = 15))]
    #[serde(default)]
    pub phone: Option<String>,
}

/// Request body for verifying a code in either flow
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    /// Email address the code was issued for
    #[validate(email)]
    pub email: String,

    /// 6-digit verification code
    #[validate(length(equal = 6))]
    pub otp: String,
}

/// Response data for a successful code issuance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpResponse {
    /// Localized confirmation message
    pub message: String,

    /// The issued code, echoed back in Development mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,

    /// Number of resends performed within the current episode
    pub resend_count: u32,

    /// Seconds until the issued code expires
    pub expires_in_seconds: i64,
}

/// Response data for a successful registration verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    /// Always true on the success path
    pub verified: bool,

    /// Localized confirmation message
    pub message: String,
}

/// Response data for a successful login verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<SessionTokens> for SessionResponse {
    fn from(tokens: SessionTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        }
    }
}
