//! Bridge from [`EmailService`] to the core delivery trait.

use std::sync::Arc;

use async_trait::async_trait;
use ks_core::services::otp::EmailChannel;

use super::email_service::EmailService;

/// Presents any infrastructure email service as the [`EmailChannel`]
/// the domain layer sends codes through. Provider errors are flattened
/// to strings at this boundary; the domain maps them to its own error.
pub struct EmailChannelAdapter {
    inner: Arc<dyn EmailService>,
}

impl EmailChannelAdapter {
    pub fn new(inner: Arc<dyn EmailService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl EmailChannel for EmailChannelAdapter {
    async fn send_code(&self, email: &str, code: &str) -> Result<String, String> {
        self.inner
            .send_verification_code(email, code)
            .await
            .map_err(|e| e.to_string())
    }
}
