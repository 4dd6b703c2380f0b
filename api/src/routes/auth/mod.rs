//! Identity verification route handlers
//!
//! This module contains the two OTP flows:
//! - `/register/*` issues and verifies codes for new signups
//! - `/login/*` adds an optional password check and finishes with session tokens
//!
//! Handlers are generic over the service collaborators so tests can wire in
//! mocks while the binary wires in Redis, SMTP and the SMS gateway.

pub mod login;
pub mod register;

use std::sync::Arc;

use chrono::Utc;

use ks_core::repositories::OtpRepository;
use ks_core::services::auth::{AuthService, PasswordVerifier, SessionIssuer};
use ks_core::services::otp::{EmailChannel, RequestCodeResult, SmsChannel};
use ks_shared::types::Language;

use crate::dto::auth::SendOtpResponse;

/// Application state that holds the shared authentication service
pub struct AppState<R, E, S, P, I>
where
    R: OtpRepository,
    E: EmailChannel,
    S: SmsChannel,
    P: PasswordVerifier,
    I: SessionIssuer,
{
    pub auth_service: Arc<AuthService<R, E, S, P, I>>,
}

/// Build the issuance response payload shared by both send-otp endpoints
pub(crate) fn send_otp_payload(result: RequestCodeResult, lang: Language) -> SendOtpResponse {
    let expires_in_seconds = result
        .expires_at
        .signed_duration_since(Utc::now())
        .num_seconds()
        .max(0);

    let message = match lang {
        Language::English => {
            "Verification code sent successfully. Please check your email.".to_string()
        }
        Language::Hindi => {
            "सत्यापन कोड सफलतापूर्वक भेज दिया गया है। कृपया अपना ईमेल देखें।".to_string()
        }
    };

    SendOtpResponse {
        message,
        otp: result.code,
        resend_count: result.resend_count,
        expires_in_seconds,
    }
}
