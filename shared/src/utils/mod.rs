//! Normalization, validation and masking helpers.

pub mod email;
pub mod phone;
pub mod validation;

pub use email::{is_valid_email, mask_email, normalize_email};
pub use phone::{is_valid_mobile, mask_phone_number, normalize_phone_number};
pub use validation::is_valid_otp_code;
