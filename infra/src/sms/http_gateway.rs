//! HTTP SMS Gateway Implementation
//!
//! Sends verification SMS through a generic HTTP gateway of the kind Indian
//! DLT aggregators expose: a JSON POST authenticated by an API key header.
//! The HTTP client enforces a request timeout, and retries are kept short
//! because the caller bounds the whole send.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use ks_shared::utils::{is_valid_mobile, mask_phone_number, normalize_phone_number};

use super::sms_service::SmsService;
use crate::InfrastructureError;

/// HTTP gateway configuration
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Gateway endpoint URL
    pub endpoint: String,
    /// API key sent with every request
    pub api_key: String,
    /// Registered sender id (DLT header)
    pub sender_id: String,
    /// Maximum retry attempts for failed requests
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for gateway requests in seconds
    pub request_timeout_secs: u64,
}

impl HttpGatewayConfig {
    /// Build from the shared SMS configuration
    ///
    /// Fails when the gateway endpoint or API key is missing.
    pub fn from_sms_config(
        config: &crate::config::SmsConfig,
    ) -> Result<Self, InfrastructureError> {
        let endpoint = config.gateway_url.clone().ok_or_else(|| {
            InfrastructureError::Config(
                "SMS gateway provider selected but SMS_GATEWAY_URL is not set".to_string(),
            )
        })?;
        let api_key = config.api_key.clone().ok_or_else(|| {
            InfrastructureError::Config(
                "SMS gateway provider selected but SMS_API_KEY is not set".to_string(),
            )
        })?;

        Ok(Self {
            endpoint,
            api_key,
            sender_id: config.sender_id.clone(),
            max_retries: 2,
            retry_delay_ms: 200,
            request_timeout_secs: config.request_timeout_secs,
        })
    }
}

/// Request payload the gateway expects
#[derive(Debug, Serialize)]
struct GatewayRequest<'a> {
    to: &'a str,
    message: &'a str,
    sender_id: &'a str,
}

/// Response payload the gateway returns
#[derive(Debug, Default, Deserialize)]
struct GatewayResponse {
    #[serde(default)]
    message_id: Option<String>,
}

/// HTTP SMS gateway implementation
pub struct HttpGatewaySmsService {
    client: reqwest::Client,
    config: HttpGatewayConfig,
}

impl HttpGatewaySmsService {
    /// Create a new HTTP gateway SMS service
    pub fn new(config: HttpGatewayConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            "HTTP SMS gateway initialized with endpoint {} and sender id {}",
            config.endpoint, config.sender_id
        );

        Ok(Self { client, config })
    }

    /// Send SMS with retry logic
    async fn send_with_retry(&self, to: &str, message: &str) -> Result<String, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                "Sending SMS attempt {}/{} to {}",
                attempts,
                self.config.max_retries,
                mask_phone_number(to)
            );

            let request = GatewayRequest {
                to,
                message,
                sender_id: &self.config.sender_id,
            };
            let result = self
                .client
                .post(&self.config.endpoint)
                .header("X-Api-Key", &self.config.api_key)
                .json(&request)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    let body = response
                        .json::<GatewayResponse>()
                        .await
                        .unwrap_or_default();
                    let message_id = body
                        .message_id
                        .unwrap_or_else(|| format!("sms_{}", Uuid::new_v4()));

                    info!(
                        target: "sms_delivery",
                        provider = "gateway",
                        phone = %mask_phone_number(to),
                        message_id = %message_id,
                        "SMS accepted by gateway"
                    );
                    return Ok(message_id);
                }
                Ok(response) => {
                    let status = response.status();
                    if should_retry_status(status) && attempts < self.config.max_retries {
                        warn!(
                            "Gateway returned {} (attempt {}/{}), retrying after {:?}",
                            status, attempts, self.config.max_retries, delay
                        );
                    } else {
                        error!("Gateway rejected SMS with status {}", status);
                        return Err(InfrastructureError::Sms(format!(
                            "Gateway rejected SMS with status {}",
                            status
                        )));
                    }
                }
                Err(e) if attempts < self.config.max_retries => {
                    warn!(
                        "Gateway request failed (attempt {}/{}): {}. Retrying after {:?}",
                        attempts, self.config.max_retries, e, delay
                    );
                }
                Err(e) => {
                    error!(
                        "Failed to reach SMS gateway after {} attempts: {}",
                        attempts, e
                    );
                    return Err(InfrastructureError::Http(e));
                }
            }

            tokio::time::sleep(delay).await;
            // Exponential backoff between retries
            delay *= 2;
        }
    }
}

/// Gateway statuses worth retrying: rate limiting and server-side failures
pub(crate) fn should_retry_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[async_trait]
impl SmsService for HttpGatewaySmsService {
    async fn send_sms(
        &self,
        phone_number: &str,
        message: &str,
    ) -> Result<String, InfrastructureError> {
        let normalized = normalize_phone_number(phone_number);
        if !is_valid_mobile(&normalized) {
            return Err(InfrastructureError::Sms(format!(
                "Invalid mobile number: {}",
                mask_phone_number(phone_number)
            )));
        }

        // One SMS segment keeps the gateway from splitting the code message
        if message.len() > 160 {
            return Err(InfrastructureError::Sms(
                "Message exceeds a single SMS segment of 160 characters".to_string(),
            ));
        }

        self.send_with_retry(&normalized, message).await
    }

    fn provider_name(&self) -> &str {
        "HttpGateway"
    }
}
