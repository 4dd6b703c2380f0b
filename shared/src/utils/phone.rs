//! Phone number utilities
//!
//! Phones are optional delivery targets for the best-effort SMS leg, never
//! identity keys. Validation covers Indian mobile numbers with or without
//! the +91 country prefix.

use once_cell::sync::Lazy;
use regex::Regex;

const COUNTRY_PREFIX: &str = "+91";

// Indian mobile numbers are 10 digits starting with 6-9
static INDIA_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\+91)?[6-9]\d{9}$").unwrap()
});

/// Strip spaces, dashes and bracketing from a phone number.
///
/// A `+` is kept only in the leading position; everything else that is not
/// an ASCII digit is dropped.
pub fn normalize_phone_number(phone: &str) -> String {
    let mut normalized = String::with_capacity(phone.len());
    for (index, ch) in phone.trim().char_indices() {
        if ch.is_ascii_digit() || (ch == '+' && index == 0) {
            normalized.push(ch);
        }
    }
    normalized
}

/// Check whether a string is a deliverable Indian mobile number.
pub fn is_valid_mobile(phone: &str) -> bool {
    INDIA_MOBILE_REGEX.is_match(&normalize_phone_number(phone))
}

/// Mask a phone number for logs (e.g., 98****3210).
///
/// The country prefix is stripped first so `+91` numbers and bare national
/// numbers mask to the same string. Inputs too short to be a phone number
/// mask entirely.
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    let national = normalized
        .strip_prefix(COUNTRY_PREFIX)
        .unwrap_or(&normalized);
    if national.len() < 7 {
        return "****".to_string();
    }
    format!("{}****{}", &national[..2], &national[national.len() - 4..])
}
