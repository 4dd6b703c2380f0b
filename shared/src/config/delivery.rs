//! Delivery channel configuration (email and SMS)

use serde::{Deserialize, Serialize};

/// Email delivery configuration
///
/// Email is the authoritative channel; the adapter is selected by
/// `provider` ("smtp" or "mock"). SMTP credentials are optional here so
/// that a partially configured environment degrades to the mock adapter
/// instead of failing startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Provider name ("smtp" or "mock")
    pub provider: String,

    /// SMTP relay host
    #[serde(default)]
    pub smtp_host: Option<String>,

    /// SMTP relay port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username
    #[serde(default)]
    pub smtp_username: Option<String>,

    /// SMTP password
    #[serde(default)]
    pub smtp_password: Option<String>,

    /// Sender address
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Sender display name
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            from_address: default_from_address(),
            from_name: default_from_name(),
        }
    }
}

impl EmailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            provider: std::env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "mock".to_string()),
            smtp_host: std::env::var("SMTP_HOST").ok(),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_smtp_port),
            smtp_username: std::env::var("SMTP_USERNAME").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            from_address: std::env::var("EMAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| default_from_address()),
            from_name: std::env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| default_from_name()),
        }
    }

    /// Check whether SMTP credentials are complete
    pub fn has_smtp_credentials(&self) -> bool {
        self.smtp_host.is_some() && self.smtp_username.is_some() && self.smtp_password.is_some()
    }
}

/// SMS delivery configuration
///
/// SMS is best-effort. `provider` selects the adapter ("gateway" for the
/// HTTP gateway, "mock", or "none" to skip the channel entirely); absence
/// of configuration is not an error.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Provider name ("gateway", "mock", or "none")
    pub provider: String,

    /// Gateway endpoint URL
    #[serde(default)]
    pub gateway_url: Option<String>,

    /// Gateway API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Registered sender id (DLT header)
    #[serde(default = "default_sender_id")]
    pub sender_id: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_sms_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: String::from("none"),
            gateway_url: None,
            api_key: None,
            sender_id: default_sender_id(),
            request_timeout_secs: default_sms_request_timeout(),
        }
    }
}

impl SmsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            provider: std::env::var("SMS_PROVIDER").unwrap_or_else(|_| "none".to_string()),
            gateway_url: std::env::var("SMS_GATEWAY_URL").ok(),
            api_key: std::env::var("SMS_API_KEY").ok(),
            sender_id: std::env::var("SMS_SENDER_ID").unwrap_or_else(|_| default_sender_id()),
            request_timeout_secs: std::env::var("SMS_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_sms_request_timeout),
        }
    }

    /// Check whether the channel is configured at all
    pub fn is_configured(&self) -> bool {
        self.provider != "none"
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    String::from("no-reply@kaamsetu.in")
}

fn default_from_name() -> String {
    String::from("KaamSetu")
}

fn default_sender_id() -> String {
    String::from("KAMSTU")
}

fn default_sms_request_timeout() -> u64 {
    3
}
