//! Customer details (national ID and name) found in recognized text.

use super::numbers::fold_digits;
use super::patterns::{CUSTOMER_NAME, NATIONAL_ID};
use crate::models::phone::CustomerInfo;

/// Extract the national ID and a labeled name from text.
pub fn extract_customer_info(text: &str) -> CustomerInfo {
    CustomerInfo {
        national_id: extract_national_id(text),
        name: extract_name(text),
    }
}

/// First valid 14-digit national ID in text.
pub fn extract_national_id(text: &str) -> Option<String> {
    let folded = fold_digits(text);
    NATIONAL_ID
        .find_iter(&folded)
        .map(|m| m.as_str())
        .find(|id| validate_national_id(id))
        .map(str::to_string)
}

fn extract_name(text: &str) -> Option<String> {
    for caps in CUSTOMER_NAME.captures_iter(text) {
        let name = caps[1].lines().next().unwrap_or("").trim();
        let len = name.chars().count();
        if len > 2 && len < 50 {
            return Some(name.to_string());
        }
    }
    None
}

/// Validate an Egyptian national ID.
///
/// 14 digits, the first being the century digit (2 for 1900s, 3 for 2000s).
pub fn validate_national_id(national_id: &str) -> bool {
    if national_id.len() != 14 || !national_id.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    matches!(national_id.as_bytes()[0], b'2' | b'3')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_national_id() {
        assert!(validate_national_id("29001011234567"));
        assert!(validate_national_id("30102151234567"));
        assert!(!validate_national_id("19001011234567")); // Century digit
        assert!(!validate_national_id("2900101123456")); // Too short
        assert!(!validate_national_id("2900101123456a"));
    }

    #[test]
    fn test_extract_arabic_customer() {
        let text = "الاسم: محمد احمد علي\nالرقم القومي 29001011234567";
        let info = extract_customer_info(text);
        assert_eq!(
            info,
            CustomerInfo {
                national_id: Some("29001011234567".to_string()),
                name: Some("محمد احمد علي".to_string()),
            }
        );
    }

    #[test]
    fn test_extract_english_customer() {
        let text = "Name: Ahmed Hassan\nID 30102151234567";
        let info = extract_customer_info(text);
        assert_eq!(info.name.as_deref(), Some("Ahmed Hassan"));
        assert_eq!(info.national_id.as_deref(), Some("30102151234567"));
    }

    #[test]
    fn test_invalid_id_skipped() {
        assert_eq!(extract_national_id("ref 12345678901234"), None);
        assert_eq!(
            extract_national_id("ref 12345678901234 id 29001011234567"),
            Some("29001011234567".to_string())
        );
    }

    #[test]
    fn test_nothing_found() {
        let info = extract_customer_info("Vodafone 01012345678");
        assert!(info.is_empty());
    }
}
