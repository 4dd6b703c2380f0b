use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth::{SendOtpRequest, VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::error::{
    domain_error_response, language_from_request, validation_error_response,
};

use ks_core::repositories::OtpRepository;
use ks_core::services::auth::{PasswordVerifier, SessionIssuer};
use ks_core::services::otp::{EmailChannel, SmsChannel};
use ks_shared::types::{ApiResponse, Language};
use ks_shared::utils::email::mask_email;

use super::{send_otp_payload, AppState};

/// Handler for POST /api/v1/auth/register/send-otp
///
/// Issues a 6-digit code for the email address and delivers it over the
/// authoritative email channel, with a best-effort SMS copy when a mobile
/// number is supplied.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "asha@example.in",
///     "phone": "9876543210"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "data": {
///         "message": "Verification code sent successfully. Please check your email.",
///         "resend_count": 0,
///         "expires_in_seconds": 900
///     },
///     "timestamp": "2026-08-25T10:00:00Z",
///     "request_id": "550e8400-e29b-41d4-a716-446655440000"
/// }
/// ```
///
/// `data.otp` carries the issued code only when the service runs in
/// Development mode.
///
/// ## Errors
/// - 400 Bad Request: malformed email address
/// - 429 Too Many Requests: resend window or resend ceiling hit
/// - 502 Bad Gateway: email delivery failed
pub async fn send_otp<R, E, S, P, I>(
    req: HttpRequest,
    state: web::Data<AppState<R, E, S, P, I>>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse
where
    R: OtpRepository + 'static,
    E: EmailChannel + 'static,
    S: SmsChannel + 'static,
    P: PasswordVerifier + 'static,
    I: SessionIssuer + 'static,
{
    let request_id = Uuid::new_v4().to_string();
    let lang = language_from_request(&req);

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors, lang, &request_id);
    }

    tracing::info!(
        request_id,
        identity = %mask_email(&request.email),
        "Processing registration code request"
    );

    match state
        .auth_service
        .register_send_code(&request.email, request.phone.as_deref())
        .await
    {
        Ok(result) => {
            tracing::info!(
                request_id,
                identity = %mask_email(&result.identity),
                message_id = %result.message_id,
                sms_dispatched = result.sms_dispatched,
                "Registration code sent"
            );
            let body = ApiResponse::success(send_otp_payload(result, lang))
                .with_request_id(request_id);
            HttpResponse::Ok().json(body)
        }
        Err(error) => domain_error_response(&error, lang, &request_id),
    }
}

/// Handler for POST /api/v1/auth/register/verify-otp
///
/// Verifies the code issued for a registration. On success the caller moves
/// on to the registration-completion step, which lives outside this service.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "asha@example.in",
///     "otp": "123456"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: no pending verification, expired code, or wrong code
/// - 409 Conflict: the code was already consumed
/// - 429 Too Many Requests: attempt limit reached
pub async fn verify_otp<R, E, S, P, I>(
    req: HttpRequest,
    state: web::Data<AppState<R, E, S, P, I>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse
where
    R: OtpRepository + 'static,
    E: EmailChannel + 'static,
    S: SmsChannel + 'static,
    P: PasswordVerifier + 'static,
    I: SessionIssuer + 'static,
{
    let request_id = Uuid::new_v4().to_string();
    let lang = language_from_request(&req);

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors, lang, &request_id);
    }

    match state
        .auth_service
        .register_verify_code(&request.email, &request.otp)
        .await
    {
        Ok(result) => {
            tracing::info!(
                request_id,
                identity = %mask_email(&result.identity),
                "Registration verification succeeded"
            );
            let payload = VerifyOtpResponse {
                verified: true,
                message: match lang {
                    Language::English => "Email verified successfully.".to_string(),
                    Language::Hindi => "ईमेल सफलतापूर्वक सत्यापित हो गया।".to_string(),
                },
            };
            let body = ApiResponse::success(payload).with_request_id(request_id);
            HttpResponse::Ok().json(body)
        }
        Err(error) => domain_error_response(&error, lang, &request_id),
    }
}
