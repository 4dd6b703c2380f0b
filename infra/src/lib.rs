//! Infrastructure adapters for the KaamSetu identity service.
//!
//! The domain crate only knows its outbound dependencies as traits; this
//! crate supplies the concrete pieces:
//!
//! - [`cache`]: Redis client and the OTP record store
//! - [`email`]: SMTP delivery for the authoritative channel, plus a mock
//! - [`sms`]: HTTP gateway delivery for the best-effort channel, plus a mock
//! - [`session`]: JWT session token issuance
//!
//! Cargo features `smtp-email` and `sms-gateway` (both default) gate the
//! real transports; with them off only the mock and disabled services build.

pub mod cache;
pub mod email;
pub mod session;
pub mod sms;

pub mod config {
    //! Settings live in `ks_shared::config`; this re-exports the sections
    //! the adapters consume so call sites can use `crate::config::*` paths.

    pub use ks_shared::config::{CacheConfig, EmailConfig, SessionConfig, SmsConfig};
}

/// Failures raised by the adapters before they are mapped into domain errors.
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis command or connection failure
    #[error("cache failure: {0}")]
    Cache(#[from] redis::RedisError),

    /// Outbound HTTP failure while talking to the SMS gateway
    #[error("outbound http failure: {0}")]
    Http(#[from] reqwest::Error),

    /// Email handoff rejected or transport unreachable
    #[error("email delivery failure: {0}")]
    Email(String),

    /// SMS handoff rejected or gateway unreachable
    #[error("sms delivery failure: {0}")]
    Sms(String),

    /// Token signing or validation failure
    #[error("session token failure: {0}")]
    Session(String),

    /// Malformed or missing adapter settings
    #[error("bad adapter configuration: {0}")]
    Config(String),

    /// Anything without a more specific variant
    #[error("infrastructure failure: {0}")]
    General(String),
}
