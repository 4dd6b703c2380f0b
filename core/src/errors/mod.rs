//! Error types shared across the domain layer.
//!
//! Specific failures live in [`types`] as [`OtpError`], [`AuthError`] and
//! [`ValidationError`]; [`DomainError`] is the umbrella the service and
//! repository signatures speak, with `#[from]` bridges so a specific error
//! travels through generic signatures untouched.

mod types;

pub use types::{AuthError, OtpError, ValidationError};

use thiserror::Error;

/// Umbrella error for domain operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Input failed a structural check outside the typed validators
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// A looked-up entity does not exist
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Caller lacks a valid session or presented bad credentials
    #[error("unauthorized")]
    Unauthorized,

    /// Store, serialization or delivery plumbing failed
    #[error("internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

pub type DomainResult<T> = Result<T, DomainError>;
