//! SMS delivery contract.

use async_trait::async_trait;

use crate::InfrastructureError;

/// A provider able to deliver a short text message to an Indian mobile
/// number.
///
/// SMS is the best-effort channel: callers treat an `Err` as a skipped
/// delivery, log it and move on, so implementations should fail fast
/// rather than retry at length. A successful send resolves to the
/// provider's message id.
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Deliver `message` to `phone_number`, returning the provider's
    /// message id.
    async fn send_sms(
        &self,
        phone_number: &str,
        message: &str,
    ) -> Result<String, InfrastructureError>;

    /// Deliver a verification code using the standard message wording.
    async fn send_verification_code(
        &self,
        phone_number: &str,
        code: &str,
    ) -> Result<String, InfrastructureError> {
        let message = format!(
            "Your KaamSetu verification code is: {}. Valid for 15 minutes.",
            code
        );
        self.send_sms(phone_number, &message).await
    }

    /// Short provider label for logs, "HttpGateway" or "Mock".
    fn provider_name(&self) -> &str;

    /// Whether the provider expects sends to succeed right now.
    async fn is_available(&self) -> bool {
        true
    }
}

/// Stand-in for deployments without an SMS contract.
///
/// Every send reports failure, which the caller logs and swallows as a
/// skipped best-effort delivery.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSmsService;

#[async_trait]
impl SmsService for DisabledSmsService {
    async fn send_sms(
        &self,
        _phone_number: &str,
        _message: &str,
    ) -> Result<String, InfrastructureError> {
        Err(InfrastructureError::Sms(
            "SMS channel is not configured".to_string(),
        ))
    }

    fn provider_name(&self) -> &str {
        "Disabled"
    }

    async fn is_available(&self) -> bool {
        false
    }
}
