//! Domain-specific error types for OTP verification and authentication
//!
//! This module provides error type definitions for OTP issuance, verification,
//! and session management. The actual user-facing messages are rendered in the
//! presentation layer for internationalization support.

use thiserror::Error;

/// OTP lifecycle errors
///
/// These errors represent the failure outcomes of the send and verify
/// operations. Messages are rendered in the presentation layer for i18n support.
#[derive(Error, Debug)]
pub enum OtpError {
    #[error("Invalid identity: {identity}")]
    InvalidIdentity { identity: String },

    #[error("Resend requested too soon, retry after {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: i64 },

    #[error("Resend limit of {max_resends} reached")]
    ResendLimitExceeded { max_resends: u32 },

    #[error("Code delivery failed: {reason}")]
    DeliveryFailed { reason: String },

    #[error("No pending verification")]
    NotFound,

    #[error("Already verified")]
    AlreadyVerified,

    #[error("Verification code expired")]
    Expired,

    #[error("Invalid verification code, {remaining_attempts} attempts remaining")]
    InvalidCode { remaining_attempts: u32 },

    #[error("Maximum verification attempts exceeded")]
    TooManyAttempts,
}

/// Authentication errors
///
/// These errors represent login failures that happen before or after the OTP
/// exchange itself.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Session issuance failed: {reason}")]
    SessionIssuanceFailed { reason: String },
}

/// Input validation errors
///
/// These errors represent request payload validation failures.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid length: {field} (expected: {expected}, actual: {actual})")]
    InvalidLength {
        field: String,
        expected: usize,
        actual: usize,
    },
}
