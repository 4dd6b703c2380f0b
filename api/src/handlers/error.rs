use actix_web::{
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};

use ks_core::errors::{AuthError, DomainError, OtpError, ValidationError};
use ks_shared::error_codes;
use ks_shared::types::{ApiResponse, ErrorBody, Language};

/// Detect the language preference from the Accept-Language header
///
/// Parses quality values so that "hi-IN,hi;q=0.9,en;q=0.8" resolves to
/// Hindi while "en-US,en;q=0.9,hi;q=0.5" resolves to English. Requests
/// without a usable header default to English.
pub fn language_from_request(req: &HttpRequest) -> Language {
    let header_str = match req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
    {
        Some(value) => value,
        None => return Language::English,
    };

    // Example header: "hi-IN,hi;q=0.9,en-US;q=0.8,en;q=0.7"
    let mut preferred = Language::English;
    let mut best_quality = 0.0f32;

    for entry in header_str.split(',') {
        let mut parts = entry.trim().split(';');
        let tag = parts.next().unwrap_or("");
        let quality = parts
            .next()
            .and_then(|q| q.trim().strip_prefix("q="))
            .and_then(|q| q.parse::<f32>().ok())
            .unwrap_or(1.0);

        if let Some(language) = Language::from_tag(tag) {
            if quality > best_quality {
                preferred = language;
                best_quality = quality;
            }
        }
    }

    preferred
}

/// Pick the message for the requested language
fn localized(lang: Language, en: &str, hi: &str) -> String {
    match lang {
        Language::English => en.to_string(),
        Language::Hindi => hi.to_string(),
    }
}

/// Build a 400 response for a request payload that failed DTO validation
pub fn validation_error_response(
    errors: &validator::ValidationErrors,
    lang: Language,
    request_id: &str,
) -> HttpResponse {
    let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    fields.sort_unstable();

    tracing::warn!(
        request_id,
        fields = ?fields,
        "Request payload failed validation"
    );

    let listed = fields.join(", ");
    let message = localized(
        lang,
        &format!("Invalid request data: {}", listed),
        &format!("अमान्य अनुरोध डेटा: {}", listed),
    );

    let body = ApiResponse::<()>::error(ErrorBody::with_code(message, error_codes::VALIDATION_ERROR))
        .with_request_id(request_id);
    HttpResponse::BadRequest().json(body)
}

/// Map a domain error to an HTTP response
///
/// Every response carries a localized message and a stable code from
/// `ks_shared::error_codes` so clients can branch without parsing text.
/// Internal error details stay in the logs and never reach the client.
pub fn domain_error_response(
    error: &DomainError,
    lang: Language,
    request_id: &str,
) -> HttpResponse {
    let (status, code, message) = match error {
        DomainError::Otp(otp_error) => otp_error_parts(otp_error, lang),
        DomainError::Auth(auth_error) => auth_error_parts(auth_error, lang),
        DomainError::ValidationErr(validation_error) => {
            validation_error_parts(validation_error, lang)
        }
        DomainError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            localized(lang, message, "अनुरोध सत्यापन विफल रहा"),
        ),
        DomainError::NotFound { resource } => (
            StatusCode::NOT_FOUND,
            error_codes::NOT_FOUND,
            localized(
                lang,
                &format!("{} not found", resource),
                &format!("{} नहीं मिला", resource),
            ),
        ),
        DomainError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            error_codes::UNAUTHORIZED,
            localized(lang, "Unauthorized access", "अनधिकृत पहुंच"),
        ),
        DomainError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            localized(
                lang,
                "An internal server error occurred",
                "आंतरिक सर्वर त्रुटि हुई",
            ),
        ),
    };

    if status.is_server_error() {
        tracing::error!(request_id, code, error = %error, "Request failed");
    } else {
        tracing::warn!(request_id, code, error = %error, "Request rejected");
    }

    let body =
        ApiResponse::<()>::error(ErrorBody::with_code(message, code)).with_request_id(request_id);
    HttpResponse::build(status).json(body)
}

fn otp_error_parts(error: &OtpError, lang: Language) -> (StatusCode, &'static str, String) {
    match error {
        OtpError::InvalidIdentity { .. } => (
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_IDENTITY,
            localized(lang, "Invalid email address", "अमान्य ईमेल पता"),
        ),
        OtpError::RateLimited {
            retry_after_seconds,
        } => (
            StatusCode::TOO_MANY_REQUESTS,
            error_codes::RATE_LIMITED,
            localized(
                lang,
                &format!(
                    "Please wait {} seconds before requesting another code",
                    retry_after_seconds
                ),
                &format!(
                    "कृपया दूसरा कोड मांगने से पहले {} सेकंड प्रतीक्षा करें",
                    retry_after_seconds
                ),
            ),
        ),
        OtpError::ResendLimitExceeded { max_resends } => (
            StatusCode::TOO_MANY_REQUESTS,
            error_codes::RESEND_LIMIT_EXCEEDED,
            localized(
                lang,
                &format!(
                    "Resend limit of {} reached. Please try again later",
                    max_resends
                ),
                &format!(
                    "पुनः भेजने की सीमा ({}) समाप्त हो गई है। कृपया बाद में पुनः प्रयास करें",
                    max_resends
                ),
            ),
        ),
        OtpError::DeliveryFailed { .. } => (
            StatusCode::BAD_GATEWAY,
            error_codes::DELIVERY_FAILED,
            localized(
                lang,
                "Could not deliver the verification code. Please try again",
                "सत्यापन कोड नहीं भेजा जा सका। कृपया पुनः प्रयास करें",
            ),
        ),
        OtpError::NotFound => (
            StatusCode::BAD_REQUEST,
            error_codes::OTP_NOT_FOUND,
            localized(
                lang,
                "No verification is in progress for this email. Please request a code first",
                "इस ईमेल के लिए कोई सत्यापन जारी नहीं है। कृपया पहले कोड का अनुरोध करें",
            ),
        ),
        OtpError::AlreadyVerified => (
            StatusCode::CONFLICT,
            error_codes::ALREADY_VERIFIED,
            localized(
                lang,
                "This email is already verified",
                "यह ईमेल पहले से सत्यापित है",
            ),
        ),
        OtpError::Expired => (
            StatusCode::BAD_REQUEST,
            error_codes::OTP_EXPIRED,
            localized(
                lang,
                "The verification code has expired. Please request a new one",
                "सत्यापन कोड की अवधि समाप्त हो गई है। कृपया नया कोड मांगें",
            ),
        ),
        OtpError::InvalidCode { remaining_attempts } => (
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_CODE,
            localized(
                lang,
                &format!(
                    "Incorrect verification code. {} attempts remaining",
                    remaining_attempts
                ),
                &format!("गलत सत्यापन कोड। {} प्रयास शेष हैं", remaining_attempts),
            ),
        ),
        OtpError::TooManyAttempts => (
            StatusCode::TOO_MANY_REQUESTS,
            error_codes::TOO_MANY_ATTEMPTS,
            localized(
                lang,
                "Too many incorrect attempts. Please request a new code",
                "बहुत अधिक गलत प्रयास। कृपया नया कोड मांगें",
            ),
        ),
    }
}

fn auth_error_parts(error: &AuthError, lang: Language) -> (StatusCode, &'static str, String) {
    match error {
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            error_codes::UNAUTHORIZED,
            localized(lang, "Invalid email or password", "अमान्य ईमेल या पासवर्ड"),
        ),
        AuthError::AccountNotFound => (
            StatusCode::NOT_FOUND,
            error_codes::NOT_FOUND,
            localized(lang, "Account not found", "खाता नहीं मिला"),
        ),
        AuthError::SessionIssuanceFailed { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            localized(
                lang,
                "Could not sign you in. Please try again",
                "साइन इन नहीं हो सका। कृपया पुनः प्रयास करें",
            ),
        ),
    }
}

fn validation_error_parts(
    error: &ValidationError,
    lang: Language,
) -> (StatusCode, &'static str, String) {
    let message = match error {
        ValidationError::RequiredField { field } => localized(
            lang,
            &format!("Required field: {}", field),
            &format!("आवश्यक फ़ील्ड: {}", field),
        ),
        ValidationError::InvalidFormat { field } => localized(
            lang,
            &format!("Invalid format for field: {}", field),
            &format!("फ़ील्ड का प्रारूप अमान्य है: {}", field),
        ),
        ValidationError::InvalidLength {
            field,
            expected,
            actual,
        } => localized(
            lang,
            &format!(
                "Invalid length for field {} (expected: {}, actual: {})",
                field, expected, actual
            ),
            &format!(
                "फ़ील्ड {} की लंबाई अमान्य है (अपेक्षित: {}, वास्तविक: {})",
                field, expected, actual
            ),
        ),
    };
    (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_language_detection_hindi() {
        let req = TestRequest::default()
            .insert_header(("Accept-Language", "hi-IN,hi;q=0.9,en-US;q=0.8"))
            .to_http_request();
        assert_eq!(language_from_request(&req), Language::Hindi);
    }

    #[test]
    fn test_language_detection_english_priority() {
        let req = TestRequest::default()
            .insert_header(("Accept-Language", "en-US,en;q=0.9,hi;q=0.5"))
            .to_http_request();
        assert_eq!(language_from_request(&req), Language::English);
    }

    #[test]
    fn test_language_detection_default() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(language_from_request(&req), Language::English);
    }

    #[test]
    fn test_language_detection_unknown_language() {
        let req = TestRequest::default()
            .insert_header(("Accept-Language", "fr-FR,fr;q=0.9"))
            .to_http_request();
        assert_eq!(language_from_request(&req), Language::English);
    }

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (
                OtpError::InvalidIdentity {
                    identity: "b***@example.in".to_string(),
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                OtpError::RateLimited {
                    retry_after_seconds: 42,
                }
                .into(),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                OtpError::ResendLimitExceeded { max_resends: 5 }.into(),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                OtpError::DeliveryFailed {
                    reason: "smtp".to_string(),
                }
                .into(),
                StatusCode::BAD_GATEWAY,
            ),
            (OtpError::NotFound.into(), StatusCode::BAD_REQUEST),
            (OtpError::AlreadyVerified.into(), StatusCode::CONFLICT),
            (OtpError::Expired.into(), StatusCode::BAD_REQUEST),
            (
                OtpError::InvalidCode {
                    remaining_attempts: 3,
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                OtpError::TooManyAttempts.into(),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                AuthError::InvalidCredentials.into(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                DomainError::Internal {
                    message: "boom".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let resp = domain_error_response(&error, Language::English, "req-test");
            assert_eq!(resp.status(), expected, "wrong status for {:?}", error);
        }
    }

    #[actix_rt::test]
    async fn test_error_body_carries_stable_code() {
        let error: DomainError = OtpError::RateLimited {
            retry_after_seconds: 42,
        }
        .into();
        let resp = domain_error_response(&error, Language::English, "req-1");
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "RATE_LIMITED");
        assert!(json["error"]["message"].as_str().unwrap().contains("42"));
        assert_eq!(json["request_id"], "req-1");
    }

    #[actix_rt::test]
    async fn test_hindi_message_selected() {
        let error: DomainError = OtpError::Expired.into();
        let resp = domain_error_response(&error, Language::Hindi, "req-2");

        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], "OTP_EXPIRED");
        assert!(json["error"]["message"].as_str().unwrap().contains("समाप्त"));
    }

    #[actix_rt::test]
    async fn test_internal_details_not_leaked() {
        let error = DomainError::Internal {
            message: "redis connection refused at 10.0.0.5".to_string(),
        };
        let resp = domain_error_response(&error, Language::English, "req-3");

        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let message = json["error"]["message"].as_str().unwrap();
        assert!(!message.contains("redis"));
        assert!(!message.contains("10.0.0.5"));
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    }
}
