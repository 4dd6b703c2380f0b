use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth::{LoginSendOtpRequest, SessionResponse, VerifyOtpRequest};
use crate::handlers::error::{
    domain_error_response, language_from_request, validation_error_response,
};

use ks_core::repositories::OtpRepository;
use ks_core::services::auth::{PasswordVerifier, SessionIssuer};
use ks_core::services::otp::{EmailChannel, SmsChannel};
use ks_shared::types::ApiResponse;
use ks_shared::utils::email::mask_email;

use super::{send_otp_payload, AppState};

/// Handler for POST /api/v1/auth/login/send-otp
///
/// Issues a login code for the email address. When a password is supplied it
/// is checked against the portal's account store first; a rejected credential
/// never burns the resend counter.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "asha@example.in",
///     "password": "secret",
///     "phone": "9876543210"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: malformed email address
/// - 401 Unauthorized: password rejected
/// - 429 Too Many Requests: resend window or resend ceiling hit
/// - 502 Bad Gateway: email delivery failed
pub async fn send_otp<R, E, S, P, I>(
    req: HttpRequest,
    state: web::Data<AppState<R, E, S, P, I>>,
    request: web::Json<LoginSendOtpRequest>,
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
        password_supplied = request.password.is_some(),
        "Processing login code request"
    );

    match state
        .auth_service
        .login_send_code(
            &request.email,
            request.password.as_deref(),
            request.phone.as_deref(),
        )
        .await
    {
        Ok(result) => {
            tracing::info!(
                request_id,
                identity = %mask_email(&result.identity),
                message_id = %result.message_id,
                sms_dispatched = result.sms_dispatched,
                "Login code sent"
            );
            let body = ApiResponse::success(send_otp_payload(result, lang))
                .with_request_id(request_id);
            HttpResponse::Ok().json(body)
        }
        Err(error) => domain_error_response(&error, lang, &request_id),
    }
}

/// Handler for POST /api/v1/auth/login/verify-otp
///
/// Verifies a login code and returns the session token pair for the verified
/// identity.
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
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "data": {
///         "access_token": "eyJhbGciOiJIUzI1NiIs...",
///         "refresh_token": "eyJhbGciOiJIUzI1NiIs...",
///         "expires_in": 900,
///         "token_type": "Bearer"
///     },
///     "timestamp": "2026-08-25T10:00:00Z",
///     "request_id": "550e8400-e29b-41d4-a716-446655440000"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: no pending verification, expired code, or wrong code
/// - 409 Conflict: the code was already consumed
/// - 429 Too Many Requests: attempt limit reached
/// - 500 Internal Server Error: session issuance failed after verification
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
        .login_verify_code(&request.email, &request.otp)
        .await
    {
        Ok(tokens) => {
            tracing::info!(
                request_id,
                identity = %mask_email(&request.email),
                "Login verification succeeded"
            );
            let body = ApiResponse::success(SessionResponse::from(tokens))
                .with_request_id(request_id);
            HttpResponse::Ok().json(body)
        }
        Err(error) => domain_error_response(&error, lang, &request_id),
    }
}
