//! Shared error codes
//!
//! Stable machine-checkable codes carried in the response envelope so that
//! clients can distinguish "try again later" from "start over" from "wrong
//! code" without parsing localized messages.

/// Error codes used across the application
pub mod error_codes {
    pub const INVALID_IDENTITY: &str = "INVALID_IDENTITY";
    pub const RATE_LIMITED: &str = "RATE_LIMITED";
    pub const RESEND_LIMIT_EXCEEDED: &str = "RESEND_LIMIT_EXCEEDED";
    pub const DELIVERY_FAILED: &str = "DELIVERY_FAILED";
    pub const OTP_NOT_FOUND: &str = "OTP_NOT_FOUND";
    pub const ALREADY_VERIFIED: &str = "ALREADY_VERIFIED";
    pub const OTP_EXPIRED: &str = "OTP_EXPIRED";
    pub const INVALID_CODE: &str = "INVALID_CODE";
    pub const TOO_MANY_ATTEMPTS: &str = "TOO_MANY_ATTEMPTS";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
}
