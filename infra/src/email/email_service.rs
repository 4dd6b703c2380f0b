//! Email delivery contract.

use async_trait::async_trait;

use crate::InfrastructureError;

/// A provider able to deliver a plain-text email.
///
/// Email is the authoritative channel: the request handler's outcome
/// follows this result, so implementations must report failure honestly
/// instead of accepting messages they cannot deliver. A successful send
/// resolves to the provider's message id.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Deliver a message, returning the provider's message id.
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError>;

    /// Deliver a verification code using the standard subject and wording.
    async fn send_verification_code(
        &self,
        to: &str,
        code: &str,
    ) -> Result<String, InfrastructureError> {
        let subject = "Your KaamSetu verification code";
        let body = format!(
            "Your KaamSetu verification code is: {}. This code will expire in 15 minutes.\n\n\
             If you did not request this code, you can ignore this message.",
            code
        );
        self.send_email(to, subject, &body).await
    }

    /// Short provider label for logs, "SMTP" or "Mock".
    fn provider_name(&self) -> &str;

    /// Whether the provider expects sends to succeed right now.
    async fn is_available(&self) -> bool {
        true
    }
}
