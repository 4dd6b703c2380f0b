//! HTTP surface for the KaamSetu identity verification service
//!
//! This crate wires the domain services from `ks_core` and the adapters from
//! `ks_infra` into an actix-web application. Everything here is presentation:
//! request DTOs, the bilingual error mapping, CORS, and route registration.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
