//! Email delivery for the authoritative channel.
//!
//! Everything here hangs off the [`EmailService`] trait: a console-printing
//! mock for development and an SMTP relay behind the `smtp-email` feature.
//! Recipient addresses never reach the logs unmasked.

pub mod channel_adapter;
pub mod email_service;
pub mod mock_email;

#[cfg(feature = "smtp-email")]
pub mod smtp;

pub use channel_adapter::EmailChannelAdapter;
pub use email_service::EmailService;
pub use mock_email::MockEmailService;

#[cfg(feature = "smtp-email")]
pub use smtp::{SmtpConfig, SmtpEmailService};

#[cfg(test)]
mod tests;

/// Pick an email implementation from the configured provider name.
///
/// A misconfigured SMTP provider degrades to the mock so a development
/// environment still starts; production deployments should treat the error
/// log as a deploy blocker since this channel decides request outcomes.
pub fn create_email_service(config: &crate::config::EmailConfig) -> Box<dyn EmailService> {
    match config.provider.as_str() {
        "mock" => Box::new(MockEmailService::new()),
        #[cfg(feature = "smtp-email")]
        "smtp" => {
            match SmtpConfig::from_email_config(config).and_then(SmtpEmailService::new) {
                Ok(service) => Box::new(service),
                Err(e) => {
                    tracing::error!("SMTP email initialization failed: {}", e);
                    tracing::warn!("Continuing with the mock email service");
                    Box::new(MockEmailService::new())
                }
            }
        }
        other => {
            tracing::warn!(provider = %other, "Unrecognized email provider, using mock");
            Box::new(MockEmailService::new())
        }
    }
}
