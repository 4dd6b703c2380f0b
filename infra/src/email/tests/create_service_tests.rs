//! Tests for the email service factory

use crate::config::EmailConfig;
use crate::email::create_email_service;

#[tokio::test]
async fn test_mock_provider() {
    let config = EmailConfig {
        provider: "mock".to_string(),
        ..Default::default()
    };

    let service = create_email_service(&config);
    assert_eq!(service.provider_name(), "Mock");
    assert!(service.is_available().await);
}

#[tokio::test]
async fn test_unknown_provider_falls_back_to_mock() {
    let config = EmailConfig {
        provider: "carrier-pigeon".to_string(),
        ..Default::default()
    };

    let service = create_email_service(&config);
    assert_eq!(service.provider_name(), "Mock");
}

#[cfg(feature = "smtp-email")]
#[tokio::test]
async fn test_smtp_provider_without_credentials_falls_back_to_mock() {
    let config = EmailConfig {
        provider: "smtp".to_string(),
        smtp_host: Some("smtp.example.in".to_string()),
        ..Default::default()
    };

    let service = create_email_service(&config);
    assert_eq!(service.provider_name(), "Mock");
}

#[cfg(feature = "smtp-email")]
#[tokio::test]
async fn test_smtp_provider_with_credentials() {
    let config = EmailConfig {
        provider: "smtp".to_string(),
        smtp_host: Some("smtp.example.in".to_string()),
        smtp_username: Some("mailer".to_string()),
        smtp_password: Some("secret".to_string()),
        ..Default::default()
    };

    let service = create_email_service(&config);
    assert_eq!(service.provider_name(), "SMTP");
}
