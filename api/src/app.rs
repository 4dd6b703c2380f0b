//! Application factory.
//!
//! `create_app` assembles the full actix-web surface used by both the
//! binary and the integration tests: tracing and CORS middleware, the
//! four auth routes, the health probe and a JSON 404.

use actix_web::{web, App, HttpResponse};
use serde_json::{json, Map, Value};
use tracing_actix_web::TracingLogger;

use ks_core::repositories::OtpRepository;
use ks_core::services::auth::{PasswordVerifier, SessionIssuer};
use ks_core::services::otp::{EmailChannel, SmsChannel};
use ks_shared::config::CorsConfig;
use ks_shared::error_codes;
use ks_shared::types::{ApiResponse, ErrorBody, HealthResponse};

use crate::middleware::cors::create_cors;
use crate::routes::auth::{login, register, AppState};

/// Assemble the application from an already-built [`AppState`].
///
/// The registration and login scopes share one generic parameter set so
/// every handler resolves against the same state the caller provides.
pub fn create_app<R, E, S, P, I>(
    app_state: web::Data<AppState<R, E, S, P, I>>,
    cors_config: &CorsConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: OtpRepository + 'static,
    E: EmailChannel + 'static,
    S: SmsChannel + 'static,
    P: PasswordVerifier + 'static,
    I: SessionIssuer + 'static,
{
    App::new()
        .app_data(app_state)
        .wrap(TracingLogger::default())
        .wrap(create_cors(cors_config))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .service(
                            web::scope("/register")
                                .route(
                                    "/send-otp",
                                    web::post().to(register::send_otp::<R, E, S, P, I>),
                                )
                                .route(
                                    "/verify-otp",
                                    web::post().to(register::verify_otp::<R, E, S, P, I>),
                                ),
                        )
                        .service(
                            web::scope("/login")
                                .route(
                                    "/send-otp",
                                    web::post().to(login::send_otp::<R, E, S, P, I>),
                                )
                                .route(
                                    "/verify-otp",
                                    web::post().to(login::verify_otp::<R, E, S, P, I>),
                                ),
                        ),
                )
                .route("/", web::get().to(api_index)),
        )
        .default_service(web::route().to(not_found))
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy("kaamsetu-api"))
}

/// Self-describing index of the v1 surface, served at `/api/v1/`.
async fn api_index() -> HttpResponse {
    let auth = json!({
        "register_send_otp": endpoint(
            "/api/v1/auth/register/send-otp",
            "Issue a verification code for a new registration",
            &[("email", "string"), ("phone", "string, optional")],
            &[
                (200, "code sent"),
                (400, "invalid email address"),
                (429, "resend window or resend limit hit"),
                (502, "email delivery failed"),
            ],
        ),
        "register_verify_otp": endpoint(
            "/api/v1/auth/register/verify-otp",
            "Verify a registration code",
            &[("email", "string"), ("otp", "string, exactly 6 digits")],
            &[
                (200, "email verified"),
                (400, "invalid, expired or missing code"),
                (409, "code already consumed"),
                (429, "attempt limit reached"),
            ],
        ),
        "login_send_otp": endpoint(
            "/api/v1/auth/login/send-otp",
            "Issue a login code, optionally checking a password first",
            &[
                ("email", "string"),
                ("password", "string, optional"),
                ("phone", "string, optional"),
            ],
            &[
                (200, "code sent"),
                (401, "password rejected"),
                (429, "resend window or resend limit hit"),
                (502, "email delivery failed"),
            ],
        ),
        "login_verify_otp": endpoint(
            "/api/v1/auth/login/verify-otp",
            "Verify a login code and receive session tokens",
            &[("email", "string"), ("otp", "string, exactly 6 digits")],
            &[
                (200, "session tokens issued"),
                (400, "invalid, expired or missing code"),
                (429, "attempt limit reached"),
            ],
        ),
    });

    HttpResponse::Ok().json(json!({
        "message": "KaamSetu identity API v1",
        "endpoints": {
            "health": "/health",
            "auth": auth,
        }
    }))
}

/// Every auth endpoint is a POST; only the path, body and outcomes vary.
fn endpoint(path: &str, summary: &str, body: &[(&str, &str)], outcomes: &[(u16, &str)]) -> Value {
    let fields: Map<String, Value> = body
        .iter()
        .map(|(name, shape)| ((*name).to_string(), Value::from(*shape)))
        .collect();
    let responses: Map<String, Value> = outcomes
        .iter()
        .map(|(status, meaning)| (status.to_string(), Value::from(*meaning)))
        .collect();
    json!({
        "path": path,
        "method": "POST",
        "summary": summary,
        "request_body": fields,
        "responses": responses,
    })
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::error(ErrorBody::with_code(
        "No resource at the requested path",
        error_codes::NOT_FOUND,
    )))
}
