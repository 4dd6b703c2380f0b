//! Cache module tests

mod otp_store_tests;
mod redis_client_tests;
