//! Registration and login flows built on top of the OTP service.
//!
//! [`AuthService`] drives code issuance for both flows, runs the
//! optional password check before a login code goes out, and turns a
//! verified login into session tokens through [`SessionIssuer`].

mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use service::AuthService;
pub use traits::{NoOpPasswordVerifier, PasswordVerifier, SessionIssuer};
