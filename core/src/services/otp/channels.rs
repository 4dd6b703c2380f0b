//! Traits for delivery channel integration

use async_trait::async_trait;

/// Trait for the email delivery channel
///
/// Email is the authoritative channel: a request to issue a code only
/// succeeds when this channel accepts the message.
#[async_trait]
pub trait EmailChannel: Send + Sync {
    /// Send a one-time code to an email address
    ///
    /// Returns the provider message id on success, or a provider error
    /// description on failure.
    async fn send_code(&self, email: &str, code: &str) -> Result<String, String>;
}

/// Trait for the SMS delivery channel
///
/// SMS is best-effort: failures are logged by the caller and never surface
/// to the requester.
#[async_trait]
pub trait SmsChannel: Send + Sync {
    /// Send a one-time code to a mobile number
    ///
    /// Returns the provider message id on success, or a provider error
    /// description on failure.
    async fn send_code(&self, phone: &str, code: &str) -> Result<String, String>;
}
