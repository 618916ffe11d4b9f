//! Common regex patterns for Egyptian phone and customer extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Canonical 11-digit mobile number (01 + 9 digits)
    pub static ref PHONE_BARE: Regex = Regex::new(
        r"\b01[0-9]{9}\b"
    ).unwrap();

    // 01x-xxxx-xxxx with optional space or hyphen separators
    pub static ref PHONE_SEPARATED: Regex = Regex::new(
        r"\b01[0-9][- ]?[0-9]{4}[- ]?[0-9]{4}\b"
    ).unwrap();

    // +20 / 0020 followed by the 10-digit national number
    pub static ref PHONE_INTERNATIONAL: Regex = Regex::new(
        r"(?:\+|\b00)20[- ]?1[0-9][- ]?[0-9]{4}[- ]?[0-9]{4}\b"
    ).unwrap();

    // Country code without plus or leading zeros
    pub static ref PHONE_COUNTRY_CODE: Regex = Regex::new(
        r"\b201[0-9]{9}\b"
    ).unwrap();

    // Egyptian national ID (14 digits)
    pub static ref NATIONAL_ID: Regex = Regex::new(
        r"\b[0-9]{14}\b"
    ).unwrap();

    // Labeled customer name (Arabic and English labels)
    pub static ref CUSTOMER_NAME: Regex = Regex::new(
        r"(?:الاسم|اسم|العميل|(?i:name))[:\s]*([A-Za-z\x{0621}-\x{064A}\s]+)"
    ).unwrap();
}

/// All phone patterns with the confidence assigned to their matches.
pub fn phone_patterns() -> [(&'static Regex, f32); 4] {
    [
        (&PHONE_BARE, 0.95),
        (&PHONE_SEPARATED, 0.9),
        (&PHONE_INTERNATIONAL, 0.9),
        (&PHONE_COUNTRY_CODE, 0.85),
    ]
}
