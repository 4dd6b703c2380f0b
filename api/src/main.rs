use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ks_api::app::create_app;
use ks_api::routes::auth::AppState;
use ks_core::services::auth::{AuthService, NoOpPasswordVerifier};
use ks_core::services::otp::{OtpService, OtpServiceConfig};
use ks_infra::cache::{RedisClient, RedisOtpStore};
use ks_infra::email::{create_email_service, EmailChannelAdapter};
use ks_infra::session::JwtSessionIssuer;
use ks_infra::sms::{create_sms_service, SmsChannelAdapter};
use ks_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    info!(mode = %config.mode, "Starting KaamSetu identity service");

    // OTP store over Redis
    let redis_client = RedisClient::new(config.cache.clone())
        .await
        .context("Failed to connect to Redis")?;
    let otp_store = Arc::new(RedisOtpStore::new(redis_client));

    // Delivery channels, selected by configuration
    let email_service = Arc::from(create_email_service(&config.email));
    let email_channel = Arc::new(EmailChannelAdapter::new(email_service));
    let sms_service = Arc::from(create_sms_service(&config.sms));
    let sms_channel = Arc::new(SmsChannelAdapter::new(sms_service));
    if !config.sms.is_configured() {
        info!("SMS channel not configured; codes are delivered by email only");
    }

    // Domain services
    let otp_config = OtpServiceConfig::from_settings(&config.otp, config.mode);
    let otp_service = Arc::new(OtpService::new(
        otp_store,
        email_channel,
        sms_channel,
        otp_config,
    ));
    let session_issuer = Arc::new(JwtSessionIssuer::new(config.session.clone()));
    let password_verifier = Arc::new(NoOpPasswordVerifier);
    let auth_service = Arc::new(AuthService::new(
        otp_service,
        password_verifier,
        session_issuer,
    ));

    let app_state = web::Data::new(AppState { auth_service });

    let bind_address = config.server.bind_address();
    let keep_alive = config.server.keep_alive_duration();
    let cors_config = config.cors.clone();

    info!(address = %bind_address, "Server listening");

    let mut server = HttpServer::new(move || create_app(app_state.clone(), &cors_config))
        .keep_alive(keep_alive)
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    if let Some(count) = config.server.worker_count() {
        server = server.workers(count);
    }

    server.run().await.context("Server terminated abnormally")
}
