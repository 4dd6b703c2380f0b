//! Console-printing email service for development.
//!
//! Nothing leaves the process: sends are printed, counted and given a fake
//! message id. In a local environment this console output is also how
//! developers read their own verification codes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

use ks_shared::utils::{is_valid_email, mask_email};

use super::email_service::EmailService;
use crate::InfrastructureError;

/// Mock email service.
///
/// Clones share the sent counter, so a test can hold one handle while the
/// service under test holds another.
#[derive(Clone)]
pub struct MockEmailService {
    sent: Arc<AtomicUsize>,
    simulate_failure: bool,
    console_output: bool,
}

impl MockEmailService {
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

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        let masked = mask_email(to);

        if !is_valid_email(to) {
            let reason = format!("Invalid recipient address: {}", masked);
            return Err(InfrastructureError::Email(reason));
        }

        if self.simulate_failure {
            warn!(recipient = %masked, "Mock email failing on request");
            return Err(InfrastructureError::Email("Simulated email delivery failure".to_string()));
        }

        // simulated network latency
        sleep(Duration::from_millis(100)).await;

        let message_id = format!("mock_email_{}", Uuid::new_v4());
        let sequence = self.sent.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            // Development aid; the full body is intentionally visible here
            // and only here.
            println!();
            println!("----- mock email #{} -----", sequence);
            println!("to:      {} ({})", to, masked);
            println!("subject: {}", subject);
            println!("id:      {}", message_id);
            println!("body:    {}", body);
            println!("--------------------------");
        }

        info!(
            target: "email_delivery",
            recipient = %masked,
            id = %message_id,
            chars = body.len(),
            "Email sent (mock)"
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
