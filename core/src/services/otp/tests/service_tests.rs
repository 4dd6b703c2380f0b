//! Unit tests for the OTP service

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::domain::entities::otp_record::CODE_LENGTH;
use crate::errors::{DomainError, OtpError, ValidationError};
use crate::repositories::otp::MockOtpRepository;
use crate::services::otp::{OtpService, OtpServiceConfig};

use super::mocks::{MockEmailChannel, MockSmsChannel};

/// Pick a code guaranteed not to match the issued one
fn wrong_code(code: &str) -> &'static str {
    if code == "000000" {
        "000001"
    } else {
        "000000"
    }
}

#[tokio::test]
async fn test_request_code_success() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));
    let config = OtpServiceConfig::default();

    let service = OtpService::new(repo.clone(), email.clone(), sms, config);

    let result = service.request_code("Asha@Example.IN", None).await;
    assert!(result.is_ok());

    let issued = result.unwrap();
    assert_eq!(issued.identity, "asha@example.in");
    assert_eq!(issued.resend_count, 0);
    assert!(issued.message_id.starts_with("mock-mail-"));
    assert!(issued.code.is_none());
    assert!(!issued.sms_dispatched);
    assert!(issued.expires_at > Utc::now() + chrono::Duration::seconds(890));
    assert!(issued.next_resend_at > Utc::now());

    // The code went out over email, keyed by the normalized identity
    let sent = email.get_sent_code("asha@example.in").expect("email should be sent");
    assert_eq!(sent.len(), CODE_LENGTH);

    // The stored record matches what was sent
    let stored = repo.stored_record("asha@example.in").await.unwrap();
    assert_eq!(stored.code, sent);
    assert!(!stored.verified);
}

#[tokio::test]
async fn test_request_code_invalid_identity() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));

    let service = OtpService::new(repo, email, sms, OtpServiceConfig::default());

    let result = service.request_code("not-an-email", None).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Otp(OtpError::InvalidIdentity { .. })
    ));
}

#[tokio::test]
async fn test_request_code_echoes_code_when_enabled() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));
    let config = OtpServiceConfig {
        echo_code: true,
        ..OtpServiceConfig::default()
    };

    let service = OtpService::new(repo, email.clone(), sms, config);

    let issued = service.request_code("asha@example.in", None).await.unwrap();

    let echoed = issued.code.expect("code should be echoed");
    assert_eq!(Some(echoed), email.get_sent_code("asha@example.in"));
}

#[tokio::test]
async fn test_request_code_sends_sms_when_phone_given() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));

    let service = OtpService::new(repo, email.clone(), sms.clone(), OtpServiceConfig::default());

    let issued = service
        .request_code("asha@example.in", Some("+919876543210"))
        .await
        .unwrap();

    assert!(issued.sms_dispatched);
    assert_eq!(
        sms.get_sent_code("+919876543210"),
        email.get_sent_code("asha@example.in")
    );
}

#[tokio::test]
async fn test_request_code_sms_failure_does_not_fail_request() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(true));

    let service = OtpService::new(repo, email.clone(), sms, OtpServiceConfig::default());

    let result = service
        .request_code("asha@example.in", Some("+919876543210"))
        .await;

    let issued = result.expect("SMS failure must not fail the request");
    assert!(!issued.sms_dispatched);
    assert!(email.get_sent_code("asha@example.in").is_some());
}

#[tokio::test]
async fn test_request_code_sms_timeout_is_swallowed() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::with_delay(Duration::from_millis(200)));
    let config = OtpServiceConfig {
        sms_timeout: Duration::from_millis(50),
        ..OtpServiceConfig::default()
    };

    let service = OtpService::new(repo, email, sms.clone(), config);

    let issued = service
        .request_code("asha@example.in", Some("+919876543210"))
        .await
        .expect("SMS timeout must not fail the request");

    assert!(!issued.sms_dispatched);
}

#[tokio::test]
async fn test_request_code_skips_sms_for_invalid_phone() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));

    let service = OtpService::new(repo, email, sms.clone(), OtpServiceConfig::default());

    let issued = service
        .request_code("asha@example.in", Some("12345"))
        .await
        .unwrap();

    assert!(!issued.sms_dispatched);
    assert_eq!(sms.sent_count(), 0);
}

#[tokio::test]
async fn test_request_code_email_failure_rolls_back_fresh_issue() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(true));
    let sms = Arc::new(MockSmsChannel::new(false));

    let service = OtpService::new(repo.clone(), email, sms, OtpServiceConfig::default());

    let result = service.request_code("asha@example.in", None).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Otp(OtpError::DeliveryFailed { .. })
    ));

    // The record was rolled back, so an immediate retry is not rate limited
    assert!(repo.stored_record("asha@example.in").await.is_none());
}

#[tokio::test]
async fn test_request_code_email_failure_restores_previous_on_resend() {
    let repo = Arc::new(MockOtpRepository::new());
    let config = OtpServiceConfig {
        min_resend_interval_seconds: 0,
        ..OtpServiceConfig::default()
    };

    let working_email = Arc::new(MockEmailChannel::new(false));
    let first = OtpService::new(
        repo.clone(),
        working_email.clone(),
        Arc::new(MockSmsChannel::new(false)),
        config.clone(),
    );
    first.request_code("asha@example.in", None).await.unwrap();
    let original_code = working_email.get_sent_code("asha@example.in").unwrap();

    let failing_email = Arc::new(MockEmailChannel::new(true));
    let second = OtpService::new(
        repo.clone(),
        failing_email,
        Arc::new(MockSmsChannel::new(false)),
        config,
    );
    let result = second.request_code("asha@example.in", None).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Otp(OtpError::DeliveryFailed { .. })
    ));

    // The prior code survived the failed resend
    let stored = repo.stored_record("asha@example.in").await.unwrap();
    assert_eq!(stored.code, original_code);
    assert_eq!(stored.resend_count, 0);
}

#[tokio::test]
async fn test_request_code_rate_limited_within_interval() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));

    let service = OtpService::new(repo, email, sms, OtpServiceConfig::default());

    service.request_code("asha@example.in", None).await.unwrap();

    let result = service.request_code("asha@example.in", None).await;
    match result.unwrap_err() {
        DomainError::Otp(OtpError::RateLimited {
            retry_after_seconds,
        }) => {
            assert!(retry_after_seconds > 0);
            assert!(retry_after_seconds <= 60);
        }
        other => panic!("Expected rate limit error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_request_code_resend_limit() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));
    let config = OtpServiceConfig {
        min_resend_interval_seconds: 0,
        max_resends: 2,
        ..OtpServiceConfig::default()
    };

    let service = OtpService::new(repo, email, sms, config);

    let first = service.request_code("asha@example.in", None).await.unwrap();
    assert_eq!(first.resend_count, 0);

    let second = service.request_code("asha@example.in", None).await.unwrap();
    assert_eq!(second.resend_count, 1);

    let third = service.request_code("asha@example.in", None).await.unwrap();
    assert_eq!(third.resend_count, 2);

    let result = service.request_code("asha@example.in", None).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Otp(OtpError::ResendLimitExceeded { max_resends: 2 })
    ));
}

#[tokio::test]
async fn test_resend_replaces_code_in_place() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));
    let config = OtpServiceConfig {
        min_resend_interval_seconds: 0,
        ..OtpServiceConfig::default()
    };

    let service = OtpService::new(repo.clone(), email.clone(), sms, config);

    service.request_code("asha@example.in", None).await.unwrap();
    service.request_code("asha@example.in", None).await.unwrap();

    // The store holds exactly the code from the latest send
    let stored = repo.stored_record("asha@example.in").await.unwrap();
    assert_eq!(stored.resend_count, 1);
    assert_eq!(Some(stored.code.clone()), email.get_sent_code("asha@example.in"));

    // The latest code verifies
    let result = service.verify_code("asha@example.in", &stored.code).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_fresh_episode_after_verification() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));

    let service = OtpService::new(repo, email.clone(), sms, OtpServiceConfig::default());

    service.request_code("asha@example.in", None).await.unwrap();
    let code = email.get_sent_code("asha@example.in").unwrap();
    service.verify_code("asha@example.in", &code).await.unwrap();

    // The completed episode does not rate limit a new one
    let issued = service.request_code("asha@example.in", None).await.unwrap();
    assert_eq!(issued.resend_count, 0);
}

#[tokio::test]
async fn test_verify_code_success() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));

    let service = OtpService::new(repo.clone(), email.clone(), sms, OtpServiceConfig::default());

    service.request_code("Asha@Example.IN", None).await.unwrap();
    let code = email.get_sent_code("asha@example.in").unwrap();

    let result = service.verify_code("Asha@Example.IN", &code).await.unwrap();
    assert_eq!(result.identity, "asha@example.in");

    // The record remains as a terminal tombstone
    let stored = repo.stored_record("asha@example.in").await.unwrap();
    assert!(stored.verified);
}

#[tokio::test]
async fn test_verify_code_wrong_code() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));

    let service = OtpService::new(repo.clone(), email.clone(), sms, OtpServiceConfig::default());

    service.request_code("asha@example.in", None).await.unwrap();
    let code = email.get_sent_code("asha@example.in").unwrap();

    let result = service.verify_code("asha@example.in", wrong_code(&code)).await;
    match result.unwrap_err() {
        DomainError::Otp(OtpError::InvalidCode { remaining_attempts }) => {
            assert_eq!(remaining_attempts, 4);
        }
        other => panic!("Expected invalid code error, got {:?}", other),
    }

    let stored = repo.stored_record("asha@example.in").await.unwrap();
    assert_eq!(stored.attempt_count, 1);
    assert!(!stored.verified);
}

#[tokio::test]
async fn test_verify_code_replay_rejected() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));

    let service = OtpService::new(repo, email.clone(), sms, OtpServiceConfig::default());

    service.request_code("asha@example.in", None).await.unwrap();
    let code = email.get_sent_code("asha@example.in").unwrap();

    service.verify_code("asha@example.in", &code).await.unwrap();

    let replay = service.verify_code("asha@example.in", &code).await;
    assert!(matches!(
        replay.unwrap_err(),
        DomainError::Otp(OtpError::AlreadyVerified)
    ));
}

#[tokio::test]
async fn test_verify_code_not_found() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));

    let service = OtpService::new(repo, email, sms, OtpServiceConfig::default());

    let result = service.verify_code("nobody@example.in", "123456").await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Otp(OtpError::NotFound)
    ));
}

#[tokio::test]
async fn test_verify_code_expired() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));
    let config = OtpServiceConfig {
        ttl_seconds: 0,
        ..OtpServiceConfig::default()
    };

    let service = OtpService::new(repo, email.clone(), sms, config);

    service.request_code("asha@example.in", None).await.unwrap();
    let code = email.get_sent_code("asha@example.in").unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;

    let result = service.verify_code("asha@example.in", &code).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Otp(OtpError::Expired)
    ));
}

#[tokio::test]
async fn test_verify_code_malformed_does_not_burn_attempt() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));

    let service = OtpService::new(repo.clone(), email, sms, OtpServiceConfig::default());

    service.request_code("asha@example.in", None).await.unwrap();

    let short = service.verify_code("asha@example.in", "12345").await;
    assert!(matches!(
        short.unwrap_err(),
        DomainError::ValidationErr(ValidationError::InvalidFormat { .. })
    ));

    let alpha = service.verify_code("asha@example.in", "1234a6").await;
    assert!(matches!(
        alpha.unwrap_err(),
        DomainError::ValidationErr(ValidationError::InvalidFormat { .. })
    ));

    let stored = repo.stored_record("asha@example.in").await.unwrap();
    assert_eq!(stored.attempt_count, 0);
}

#[tokio::test]
async fn test_verify_code_attempts_exhausted() {
    let repo = Arc::new(MockOtpRepository::new());
    let email = Arc::new(MockEmailChannel::new(false));
    let sms = Arc::new(MockSmsChannel::new(false));
    let config = OtpServiceConfig {
        max_attempts: 2,
        ..OtpServiceConfig::default()
    };

    let service = OtpService::new(repo, email.clone(), sms, config);

    service.request_code("asha@example.in", None).await.unwrap();
    let code = email.get_sent_code("asha@example.in").unwrap();
    let bad = wrong_code(&code);

    let first = service.verify_code("asha@example.in", bad).await;
    assert!(matches!(
        first.unwrap_err(),
        DomainError::Otp(OtpError::InvalidCode {
            remaining_attempts: 1
        })
    ));

    // The attempt that exhausts the allowance reports the lockout
    let second = service.verify_code("asha@example.in", bad).await;
    assert!(matches!(
        second.unwrap_err(),
        DomainError::Otp(OtpError::TooManyAttempts)
    ));

    // Even the correct code is refused afterwards
    let third = service.verify_code("asha@example.in", &code).await;
    assert!(matches!(
        third.unwrap_err(),
        DomainError::Otp(OtpError::TooManyAttempts)
    ));
}
