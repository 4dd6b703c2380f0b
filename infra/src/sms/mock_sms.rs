//! Console-printing SMS service for development.
//!
//! Nothing leaves the process: sends are printed, counted and given a fake
//! message id. The failure switch lets integration tests exercise the
//! best-effort semantics of the SMS leg without a gateway.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

use ks_shared::utils::{is_valid_mobile, mask_phone_number};

use super::sms_service::SmsService;
use crate::InfrastructureError;

/// Mock SMS service.
///
/// Clones share the sent counter, so a test can hold one handle while the
/// service under test holds another.
#[derive(Clone)]
pub struct MockSmsService {
    sent: Arc<AtomicUsize>,
    simulate_failure: bool,
    console_output: bool,
}

impl MockSmsService {
    /// Mock that prints every message and never fails.
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Mock with explicit console and failure behavior.
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            sent: Arc::new(AtomicUsize::new(0)),
            simulate_failure,
            console_output,
        }
    }

    /// Number of messages accepted so far.
    pub fn sent_count(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsService for MockSmsService {
    async fn send_sms(
        &self,
        phone_number: &str,
        message: &str,
    ) -> Result<String, InfrastructureError> {
        let masked = mask_phone_number(phone_number);

        if !is_valid_mobile(phone_number) {
            let reason = format!("Invalid mobile number: {}", masked);
            return Err(InfrastructureError::Sms(reason));
        }

        if self.simulate_failure {
            warn!(phone = %masked, "Mock SMS failing on request");
            return Err(InfrastructureError::Sms("Simulated SMS sending failure".to_string()));
        }

        // simulated network latency
        sleep(Duration::from_millis(100)).await;

        let message_id = format!("mock_sms_{}", Uuid::new_v4());
        let sequence = self.sent.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            // Development aid; the full body is intentionally visible here
            // and only here.
            println!();
            println!("----- mock sms #{} -----", sequence);
            println!("to:   {} ({})", phone_number, masked);
            println!("id:   {}", message_id);
            println!("body: {}", message);
            println!("------------------------");
        }

        info!(
            target: "sms_delivery",
            phone = %masked,
            id = %message_id,
            chars = message.len(),
            "SMS sent (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }

    async fn is_available(&self) -> bool {
        !self.simulate_failure
    }
}
