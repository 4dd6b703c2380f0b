//! Runtime configuration, one sub-module per concern.
//!
//! [`AppConfig`] aggregates the pieces; `from_env` is the only
//! constructor the binary uses. Sub-modules: [`cache`] for the Redis
//! OTP store, [`delivery`] for the email and SMS channels,
//! [`environment`] for mode detection, [`otp`] for code policy,
//! [`server`] for HTTP and CORS, [`session`] for JWT issuance.

pub mod cache;
pub mod delivery;
pub mod environment;
pub mod otp;
pub mod server;
pub mod session;

use serde::{Deserialize, Serialize};

pub use cache::CacheConfig;
pub use delivery::{EmailConfig, SmsConfig};
pub use environment::OperatingMode;
pub use otp::OtpConfig;
pub use server::{CorsConfig, ServerConfig};
pub use session::SessionConfig;

/// Everything the service reads at startup, in one place.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    pub mode: OperatingMode,
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub otp: OtpConfig,
    pub email: EmailConfig,
    pub sms: SmsConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl AppConfig {
    /// Assemble the configuration from environment variables.
    ///
    /// Development mode swaps in the permissive CORS policy; every
    /// other piece reads its own variables.
    pub fn from_env() -> Self {
        let mode = OperatingMode::from_env();
        Self {
            mode,
            server: ServerConfig::from_env(),
            cache: CacheConfig::from_env(),
            otp: OtpConfig::from_env(),
            email: EmailConfig::from_env(),
            sms: SmsConfig::from_env(),
            session: SessionConfig::from_env(),
            cors: if mode.is_development() {
                CorsConfig::development()
            } else {
                CorsConfig::default()
            },
        }
    }
}
