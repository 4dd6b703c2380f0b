//! Session token settings.
//!
//! Verified identities receive a JWT pair; these settings control signing
//! and lifetimes. The bundled secret exists so development environments
//! start without ceremony, and issuers warn while it is still in place.

use serde::{Deserialize, Serialize};

const DEV_SECRET: &str = "development-secret-change-in-production";
const DEFAULT_ACCESS_EXPIRY_SECS: i64 = 900;
const DEFAULT_REFRESH_EXPIRY_SECS: i64 = 7 * 24 * 3600;
const DEFAULT_ISSUER: &str = "kaamsetu";

/// Settings for issuing JWT session tokens, signed with HS256.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// HMAC secret the tokens are signed with
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,

    /// Value of the `iss` claim
    pub issuer: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_SECRET.to_string(),
            access_token_expiry: DEFAULT_ACCESS_EXPIRY_SECS,
            refresh_token_expiry: DEFAULT_REFRESH_EXPIRY_SECS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl SessionConfig {
    /// Configuration with the given secret, lifetimes at defaults.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }

    /// Read settings from `JWT_SECRET`, `JWT_ACCESS_TOKEN_EXPIRY` and
    /// `JWT_REFRESH_TOKEN_EXPIRY`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.jwt_secret = secret;
        }
        if let Some(expiry) = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .ok()
            .and_then(|value| value.parse().ok())
        {
            config.access_token_expiry = expiry;
        }
        if let Some(expiry) = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .ok()
            .and_then(|value| value.parse().ok())
        {
            config.refresh_token_expiry = expiry;
        }
        config
    }

    /// Whether the bundled development secret is still in place.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEV_SECRET
    }
}
