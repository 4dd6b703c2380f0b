//! Domain layer of the KaamSetu identity service.
//!
//! Everything in this crate is transport-agnostic: the OTP issue and
//! verify services in [`services`], the session issuance in
//! [`services::auth`], and the storage contracts in [`repositories`]
//! know nothing about HTTP or Redis. The `api` and `infra` crates plug
//! into the traits defined here.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;
