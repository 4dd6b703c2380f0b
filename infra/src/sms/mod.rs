//! SMS delivery for the best-effort channel.
//!
//! Everything here hangs off the [`SmsService`] trait: a console-printing
//! mock for development, a production HTTP gateway behind the `sms-gateway`
//! feature, and [`DisabledSmsService`] for deployments with no SMS
//! contract. Phone numbers never reach the logs unmasked.

pub mod channel_adapter;
pub mod mock_sms;
pub mod sms_service;

#[cfg(feature = "sms-gateway")]
pub mod http_gateway;

pub use channel_adapter::SmsChannelAdapter;
pub use mock_sms::MockSmsService;
pub use sms_service::{DisabledSmsService, SmsService};

#[cfg(feature = "sms-gateway")]
pub use http_gateway::{HttpGatewayConfig, HttpGatewaySmsService};

#[cfg(test)]
mod tests;

/// Pick an SMS implementation from the configured provider name.
///
/// `"none"` yields a service that reports every send as failed, which the
/// caller logs and swallows as a skipped best-effort delivery. An unknown
/// provider, or a gateway that fails to initialize, degrades to the mock
/// so startup never hinges on the SMS leg.
pub fn create_sms_service(config: &crate::config::SmsConfig) -> Box<dyn SmsService> {
    match config.provider.as_str() {
        "mock" => Box::new(MockSmsService::new()),
        "none" => Box::new(DisabledSmsService),
        #[cfg(feature = "sms-gateway")]
        "gateway" => {
            match HttpGatewayConfig::from_sms_config(config).and_then(HttpGatewaySmsService::new) {
                Ok(service) => Box::new(service),
                Err(e) => {
                    tracing::error!("SMS gateway initialization failed: {}", e);
                    tracing::warn!("Continuing with the mock SMS service");
                    Box::new(MockSmsService::new())
                }
            }
        }
        other => {
            tracing::warn!(provider = %other, "Unrecognized SMS provider, using mock");
            Box::new(MockSmsService::new())
        }
    }
}
