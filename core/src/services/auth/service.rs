//! Main authentication service implementation

use std::sync::Arc;

use ks_shared::utils::email::{mask_email, normalize_email};

use crate::domain::value_objects::SessionTokens;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::OtpRepository;
use crate::services::otp::{
    EmailChannel, OtpService, RequestCodeResult, SmsChannel, VerifyCodeResult,
};

use super::traits::{PasswordVerifier, SessionIssuer};

/// Authentication service for the registration and login flows
///
/// Both flows ride on the same OTP exchange; login additionally supports an
/// up-front password check and finishes with session issuance.
pub struct AuthService<R, E, S, P, I>
where
    R: OtpRepository,
    E: EmailChannel,
    S: SmsChannel,
    P: PasswordVerifier,
    I: SessionIssuer,
{
    /// OTP service driving code issuance and verification
    otp_service: Arc<OtpService<R, E, S>>,
    /// Credential check collaborator
    password_verifier: Arc<P>,
    /// Session token issuance collaborator
    session_issuer: Arc<I>,
}

impl<R, E, S, P, I> AuthService<R, E, S, P, I>
where
    R: OtpRepository,
    E: EmailChannel,
    S: SmsChannel,
    P: PasswordVerifier,
    I: SessionIssuer,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `otp_service` - Service for code issuance and verification
    /// * `password_verifier` - Collaborator for login password checks
    /// * `session_issuer` - Collaborator for session token issuance
    pub fn new(
        otp_service: Arc<OtpService<R, E, S>>,
        password_verifier: Arc<P>,
        session_issuer: Arc<I>,
    ) -> Self {
        Self {
            otp_service,
            password_verifier,
            session_issuer,
        }
    }

    /// Issue a registration code for an identity
    ///
    /// # Arguments
    ///
    /// * `identity` - The email address registering with the portal
    /// * `phone` - Optional mobile number for supplementary SMS delivery
    ///
    /// # Returns
    ///
    /// * `Ok(RequestCodeResult)` - Issuance details and the resend window
    /// * `Err(DomainError)` - If validation, limits or delivery fail
    pub async fn register_send_code(
        &self,
        identity: &str,
        phone: Option<&str>,
    ) -> DomainResult<RequestCodeResult> {
        self.otp_service.request_code(identity, phone).await
    }

    /// Verify a registration code
    ///
    /// On success the caller proceeds to the registration-completion step,
    /// which lives outside this subsystem.
    ///
    /// # Arguments
    ///
    /// * `identity` - The email address the code was issued for
    /// * `code` - The code to verify
    pub async fn register_verify_code(
        &self,
        identity: &str,
        code: &str,
    ) -> DomainResult<VerifyCodeResult> {
        self.otp_service.verify_code(identity, code).await
    }

    /// Issue a login code for an identity
    ///
    /// This method:
    /// 1. Checks the password against the account store when one is supplied
    /// 2. Delegates to the OTP service for code issuance and delivery
    ///
    /// # Arguments
    ///
    /// * `identity` - The email address logging in
    /// * `password` - Optional password to check before issuing a code
    /// * `phone` - Optional mobile number for supplementary SMS delivery
    ///
    /// # Returns
    ///
    /// * `Ok(RequestCodeResult)` - Issuance details and the resend window
    /// * `Err(DomainError)` - If the password is rejected or issuance fails
    pub async fn login_send_code(
        &self,
        identity: &str,
        password: Option<&str>,
        phone: Option<&str>,
    ) -> DomainResult<RequestCodeResult> {
        let normalized = normalize_email(identity);

        // Step 1: Password check happens before any OTP work so a rejected
        // credential burns neither the resend counter nor the cooldown
        if let Some(password) = password {
            let accepted = self
                .password_verifier
                .verify_password(&normalized, password)
                .await
                .map_err(|e| DomainError::Internal {
                    message: format!("Password verification failed: {}", e),
                })?;

            if !accepted {
                tracing::warn!(
                    identity = %mask_email(&normalized),
                    event = "login_password_rejected",
                    "Password rejected before code issuance"
                );
                return Err(AuthError::InvalidCredentials.into());
            }
        }

        // Step 2: Issue and deliver the code
        self.otp_service.request_code(&normalized, phone).await
    }

    /// Verify a login code and issue session tokens
    ///
    /// This method:
    /// 1. Delegates to the OTP service for code verification
    /// 2. Hands the verified identity to the session issuer
    ///
    /// # Arguments
    ///
    /// * `identity` - The email address the code was issued for
    /// * `code` - The code to verify
    ///
    /// # Returns
    ///
    /// * `Ok(SessionTokens)` - Access/refresh pair for the verified identity
    /// * `Err(DomainError)` - If verification or issuance fails
    pub async fn login_verify_code(
        &self,
        identity: &str,
        code: &str,
    ) -> DomainResult<SessionTokens> {
        // Step 1: Verify the code. Failures propagate with their specific
        // reason (not found, expired, mismatch, attempt lockout).
        let verified = self.otp_service.verify_code(identity, code).await?;

        // Step 2: Hand off to the session issuer
        let tokens = self
            .session_issuer
            .issue_session(&verified.identity)
            .await
            .map_err(|e| {
                tracing::error!(
                    identity = %mask_email(&verified.identity),
                    error = %e,
                    event = "session_issuance_failed",
                    "Session issuance failed after successful verification"
                );
                DomainError::Auth(AuthError::SessionIssuanceFailed { reason: e })
            })?;

        tracing::info!(
            identity = %mask_email(&verified.identity),
            event = "session_issued",
            "Session tokens issued for verified identity"
        );

        Ok(tokens)
    }
}
