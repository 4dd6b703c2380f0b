//! Bridge from [`SmsService`] to the core delivery trait.

use std::sync::Arc;

use async_trait::async_trait;
use ks_core::services::otp::SmsChannel;

use super::sms_service::SmsService;

/// Presents any infrastructure SMS service as the [`SmsChannel`] the
/// domain layer sends codes through. Provider errors are flattened to
/// strings at this boundary; the domain only logs them.
pub struct SmsChannelAdapter {
    inner: Arc<dyn SmsService>,
}

impl SmsChannelAdapter {
    pub fn new(inner: Arc<dyn SmsService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SmsChannel for SmsChannelAdapter {
    async fn send_code(&self, phone: &str, code: &str) -> Result<String, String> {
        self.inner
            .send_verification_code(phone, code)
            .await
            .map_err(|e| e.to_string())
    }
}
