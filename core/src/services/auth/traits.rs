//! Traits for external authentication collaborators

use async_trait::async_trait;

use crate::domain::value_objects::SessionTokens;

/// Trait for the portal's credential check
///
/// The account store itself lives outside this subsystem; login only needs
/// a yes/no answer before a code is issued.
#[async_trait]
pub trait PasswordVerifier: Send + Sync {
    /// Check a password for an identity
    ///
    /// Returns `Ok(true)` when the credentials match, `Ok(false)` when they
    /// do not, and an error description when the account store is unreachable.
    async fn verify_password(&self, identity: &str, password: &str) -> Result<bool, String>;
}

/// Trait for session token issuance
///
/// Called exactly once per successful login verification.
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    /// Issue an access/refresh token pair for a verified identity
    async fn issue_session(&self, identity: &str) -> Result<SessionTokens, String>;
}

/// Password verifier used when no account store is wired in
///
/// Accepts every credential pair. Deployments that require password checks
/// must inject the portal's account service instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPasswordVerifier;

#[async_trait]
impl PasswordVerifier for NoOpPasswordVerifier {
    async fn verify_password(&self, _identity: &str, _password: &str) -> Result<bool, String> {
        Ok(true)
    }
}
