//! Session token value object returned after a verified login.

use serde::{Deserialize, Serialize};

/// Session tokens issued after a successful OTP verification
///
/// The tokens themselves come from the session issuer; this value object is
/// the shape handed back to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    /// Access token for API authentication
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    pub refresh_token: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,

    /// Token scheme, always "Bearer"
    pub token_type: String,
}

impl SessionTokens {
    /// Creates a new session token pair with the Bearer scheme
    ///
    /// # Arguments
    ///
    /// * `access_token` - The issued access token
    /// * `refresh_token` - The issued refresh token
    /// * `expires_in` - Access token lifetime in seconds
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}
