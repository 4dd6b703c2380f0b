//! Redis-backed storage for verification codes.
//!
//! [`RedisClient`] wraps the raw connection with retries;
//! [`RedisOtpStore`] implements the core repository contract on top of
//! it. `CacheConfig` is re-exported for callers that construct a store
//! directly.

pub mod otp_store;
pub mod redis_client;

#[cfg(test)]
mod tests;

pub use ks_shared::config::cache::CacheConfig;
pub use otp_store::{OtpStoreConfig, RedisOtpStore};
pub use redis_client::RedisClient;
