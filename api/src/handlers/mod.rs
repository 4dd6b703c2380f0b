//! Shared handler utilities
//!
//! The error handler maps `DomainError` values onto HTTP responses with
//! localized messages and stable machine-checkable codes.

pub mod error;

pub use error::{domain_error_response, language_from_request, validation_error_response};
