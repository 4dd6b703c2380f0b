//! JWT session token issuance
//!
//! Signs an access/refresh token pair for an identity that has completed
//! login verification. Tokens are HS256-signed with the configured secret.
//! Nothing is stored server-side, so issued sessions survive restarts as
//! long as the secret is stable.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use ks_core::domain::value_objects::SessionTokens;
use ks_core::services::auth::SessionIssuer;
use ks_shared::config::SessionConfig;
use ks_shared::utils::mask_email;

use crate::InfrastructureError;

/// Claims carried by every session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Verified identity the token was issued for
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch)
    pub iat: i64,
    /// Expiry timestamp (seconds since epoch)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
    /// Token kind ("access" or "refresh")
    pub token_type: String,
}

/// JWT-backed session issuer
pub struct JwtSessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    config: SessionConfig,
}

impl JwtSessionIssuer {
    /// Create an issuer from session configuration
    pub fn new(config: SessionConfig) -> Self {
        if config.uses_default_secret() {
            warn!("JWT secret is the development default; set JWT_SECRET before going live");
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);

        Self {
            encoding_key,
            decoding_key,
            header: Header::new(Algorithm::HS256),
            validation,
            config,
        }
    }

    /// Sign one token of the given kind
    fn encode_token(
        &self,
        identity: &str,
        token_type: &str,
        expiry_seconds: i64,
    ) -> Result<String, InfrastructureError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: identity.to_string(),
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry_seconds)).timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: token_type.to_string(),
        };

        encode(&self.header, &claims, &self.encoding_key).map_err(|e| {
            InfrastructureError::Session(format!("Failed to sign {} token: {}", token_type, e))
        })
    }

    /// Decode and validate a token issued by this service
    ///
    /// Resource servers use this to check bearer tokens on authenticated
    /// routes. Expiry and issuer are both validated.
    pub fn decode_claims(&self, token: &str) -> Result<JwtClaims, InfrastructureError> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| InfrastructureError::Session(format!("Invalid session token: {}", e)))
    }
}

#[async_trait]
impl SessionIssuer for JwtSessionIssuer {
    async fn issue_session(&self, identity: &str) -> Result<SessionTokens, String> {
        let access_token = self
            .encode_token(identity, "access", self.config.access_token_expiry)
            .map_err(|e| e.to_string())?;
        let refresh_token = self
            .encode_token(identity, "refresh", self.config.refresh_token_expiry)
            .map_err(|e| e.to_string())?;

        info!(
            identity = %mask_email(identity),
            event = "session_tokens_signed",
            expires_in = self.config.access_token_expiry,
            "Session token pair issued"
        );

        Ok(SessionTokens::new(
            access_token,
            refresh_token,
            self.config.access_token_expiry,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> JwtSessionIssuer {
        JwtSessionIssuer::new(SessionConfig::new("test-secret-for-sessions"))
    }

    #[tokio::test]
    async fn test_issue_session_returns_bearer_pair() {
        let tokens = issuer().issue_session("asha@example.in").await.unwrap();

        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 900);
        assert!(!tokens.access_token.is_empty());
        assert!(!tokens.refresh_token.is_empty());
        assert_ne!(tokens.access_token, tokens.refresh_token);
    }

    #[tokio::test]
    async fn test_access_claims_round_trip() {
        let issuer = issuer();
        let tokens = issuer.issue_session("asha@example.in").await.unwrap();

        let claims = issuer.decode_claims(&tokens.access_token).unwrap();
        assert_eq!(claims.sub, "asha@example.in");
        assert_eq!(claims.iss, "kaamsetu");
        assert_eq!(claims.token_type, "access");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn test_refresh_token_outlives_access_token() {
        let issuer = issuer();
        let tokens = issuer.issue_session("asha@example.in").await.unwrap();

        let access = issuer.decode_claims(&tokens.access_token).unwrap();
        let refresh = issuer.decode_claims(&tokens.refresh_token).unwrap();

        assert_eq!(refresh.token_type, "refresh");
        assert!(refresh.exp > access.exp);
    }

    #[tokio::test]
    async fn test_tampered_token_is_rejected() {
        let issuer = issuer();
        let tokens = issuer.issue_session("asha@example.in").await.unwrap();

        let tampered = format!("{}x", tokens.access_token);
        assert!(issuer.decode_claims(&tampered).is_err());
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_rejected() {
        let tokens = issuer().issue_session("asha@example.in").await.unwrap();

        let other = JwtSessionIssuer::new(SessionConfig::new("a-different-secret"));
        assert!(other.decode_claims(&tokens.access_token).is_err());
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let mut config = SessionConfig::new("test-secret-for-sessions");
        config.access_token_expiry = -120;

        let issuer = JwtSessionIssuer::new(config);
        let tokens = issuer.issue_session("asha@example.in").await.unwrap();

        assert!(issuer.decode_claims(&tokens.access_token).is_err());
    }
}
