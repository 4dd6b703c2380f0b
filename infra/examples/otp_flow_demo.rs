//! Example: End-to-end OTP request and verification flow
//!
//! Wires the mock delivery channels and the in-memory repository into the
//! core OTP service, then walks one verification round. No Redis or SMTP
//! relay is needed; the code is printed by the mock email channel.
//!
//! Run with: cargo run --example otp_flow_demo -p ks_infra

use std::sync::Arc;

use ks_core::repositories::MockOtpRepository;
use ks_core::services::otp::{OtpService, OtpServiceConfig};
use ks_infra::email::{EmailChannelAdapter, EmailService, MockEmailService};
use ks_infra::sms::{MockSmsService, SmsChannelAdapter, SmsService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let repository = Arc::new(MockOtpRepository::default());
    let email_service: Arc<dyn EmailService> = Arc::new(MockEmailService::new());
    let sms_service: Arc<dyn SmsService> = Arc::new(MockSmsService::new());

    // Echo the code back so the demo can verify without reading the console
    let config = OtpServiceConfig {
        echo_code: true,
        ..Default::default()
    };

    let service = OtpService::new(
        repository,
        Arc::new(EmailChannelAdapter::new(email_service)),
        Arc::new(SmsChannelAdapter::new(sms_service)),
        config,
    );

    let issued = service
        .request_code("asha@example.in", Some("9876543210"))
        .await?;
    println!(
        "Issued code for {} (expires {}, SMS dispatched: {})",
        issued.identity, issued.expires_at, issued.sms_dispatched
    );

    let code = issued.code.ok_or("code echo is disabled")?;
    let verified = service.verify_code("asha@example.in", &code).await?;
    println!("Verified {} at {}", verified.identity, verified.verified_at);

    Ok(())
}
