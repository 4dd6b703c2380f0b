//! Route handlers, one sub-module per URL scope.

pub mod auth;
