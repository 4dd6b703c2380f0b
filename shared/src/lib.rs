//! Cross-cutting pieces for the KaamSetu identity service: configuration,
//! the response envelope, language negotiation and small text utilities.
//!
//! Everything here is dependency-light so the domain, infrastructure and
//! API crates can all pull it in without cycles.

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

pub use config::{
    AppConfig, CacheConfig, CorsConfig, EmailConfig, OperatingMode, OtpConfig, ServerConfig,
    SessionConfig, SmsConfig,
};
pub use errors::error_codes;
pub use types::{ApiResponse, ErrorBody, Language};
pub use utils::{email, validation};
