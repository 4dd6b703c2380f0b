//! Stateful domain objects and their policy constants.

pub mod otp_record;
