//! OTP service module for email-first identity verification
//!
//! This module provides the complete one-time code workflow:
//! - Secure code generation
//! - Dual-channel delivery (authoritative email, best-effort SMS)
//! - Resend throttling with per-episode ceilings
//! - Verification with attempt tracking and terminal states

mod channels;
mod config;
mod generator;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use channels::{EmailChannel, SmsChannel};
pub use config::OtpServiceConfig;
pub use generator::CodeGenerator;
pub use service::OtpService;
pub use types::{RequestCodeResult, VerifyCodeResult};
