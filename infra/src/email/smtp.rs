//! SMTP Email Service Implementation
//!
//! Delivers verification email through an SMTP relay using `lettre`.
//! The transport enforces a request timeout, so a hung relay fails the
//! request instead of stalling it indefinitely.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use ks_shared::utils::mask_email;

use super::email_service::EmailService;
use crate::InfrastructureError;

/// Default timeout for SMTP exchanges in seconds
const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 10;

/// SMTP relay configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP relay host
    pub host: String,
    /// SMTP relay port
    pub port: u16,
    /// SMTP username
    pub username: String,
    /// SMTP password
    pub password: String,
    /// Sender address
    pub from_address: String,
    /// Sender display name
    pub from_name: String,
    /// Timeout for SMTP exchanges in seconds
    pub request_timeout_secs: u64,
}

impl SmtpConfig {
    /// Build from the shared email configuration
    ///
    /// Fails when the SMTP credentials are incomplete.
    pub fn from_email_config(
        config: &crate::config::EmailConfig,
    ) -> Result<Self, InfrastructureError> {
        let (host, username, password) = match (
            &config.smtp_host,
            &config.smtp_username,
            &config.smtp_password,
        ) {
            (Some(host), Some(username), Some(password)) => {
                (host.clone(), username.clone(), password.clone())
            }
            _ => {
                return Err(InfrastructureError::Config(
                    "SMTP provider selected but SMTP_HOST, SMTP_USERNAME and SMTP_PASSWORD are not all set"
                        .to_string(),
                ))
            }
        };

        Ok(Self {
            host,
            port: config.smtp_port,
            username,
            password,
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
            request_timeout_secs: DEFAULT_SMTP_TIMEOUT_SECS,
        })
    }
}

/// SMTP email service implementation
pub struct SmtpEmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_mailbox: Mailbox,
    config: SmtpConfig,
}

impl SmtpEmailService {
    /// Create a new SMTP email service
    ///
    /// The relay connection is established lazily on first send; this only
    /// validates the configuration and builds the transport.
    pub fn new(config: SmtpConfig) -> Result<Self, InfrastructureError> {
        let from_mailbox = format!("{} <{}>", config.from_name, config.from_address)
            .parse::<Mailbox>()
            .map_err(|e| {
                InfrastructureError::Config(format!("Invalid sender address: {}", e))
            })?;

        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| InfrastructureError::Config(format!("Invalid SMTP relay host: {}", e)))?
            .port(config.port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(config.request_timeout_secs)))
            .build();

        info!(
            "SMTP email service initialized for relay {}:{} as {}",
            config.host,
            config.port,
            mask_email(&config.from_address)
        );

        Ok(Self {
            transport,
            from_mailbox,
            config,
        })
    }
}

#[async_trait]
impl EmailService for SmtpEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        let recipient = to.parse::<Mailbox>().map_err(|e| {
            InfrastructureError::Email(format!("Invalid recipient address: {}", e))
        })?;

        let message = Message::builder()
            .from(self.from_mailbox.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| InfrastructureError::Email(format!("Failed to build message: {}", e)))?;

        debug!(
            "Sending email to {} via {} (body length: {} chars)",
            mask_email(to),
            self.config.host,
            body.len()
        );

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| InfrastructureError::Email(format!("SMTP delivery failed: {}", e)))?;

        let message_id = format!("smtp_{}", Uuid::new_v4());
        info!(
            target: "email_delivery",
            provider = "smtp",
            recipient = %mask_email(to),
            message_id = %message_id,
            smtp_code = %response.code(),
            "Email accepted by relay"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "SMTP"
    }
}
