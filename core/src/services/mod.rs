//! Use cases of the identity service, grouped per flow.

pub mod auth;
pub mod otp;
