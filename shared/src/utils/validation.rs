//! Shape checks for values crossing the API boundary.

use once_cell::sync::Lazy;
use regex::Regex;

// OTP codes are exactly six ASCII digits, zero-padded
static OTP_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").unwrap());

/// Check if a submitted one-time code has the expected shape
///
/// Shape-only check; it says nothing about whether the code matches the
/// stored one.
pub fn is_valid_otp_code(code: &str) -> bool {
    OTP_CODE_REGEX.is_match(code)
}
