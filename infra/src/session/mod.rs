//! Session Module
//!
//! JWT-backed session token issuance for identities that have completed
//! login verification.

pub mod jwt;

pub use jwt::{JwtClaims, JwtSessionIssuer};
