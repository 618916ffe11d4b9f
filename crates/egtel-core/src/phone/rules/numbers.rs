//! Egyptian mobile number extraction, normalization and validation.

use std::borrow::Cow;
use std::collections::BTreeSet;

use super::patterns::phone_patterns;
use super::{ExtractionMatch, FieldExtractor};

/// Valid mobile prefixes.
const VALID_PREFIXES: [&str; 4] = ["010", "011", "012", "015"];

/// Confidence assigned to numbers recovered by the dense digit scan.
const DENSE_SCAN_CONFIDENCE: f32 = 0.5;

/// Phone number extractor.
///
/// Runs every phone pattern over the text, then (unless disabled) a dense scan
/// over the text with all non-digits removed. Positions of pattern matches
/// refer to [`fold_digits`] applied to the input; dense-scan matches carry no
/// position.
pub struct PhoneMatcher {
    dense_scan: bool,
}

impl PhoneMatcher {
    /// Create a new matcher with the dense scan enabled.
    pub fn new() -> Self {
        Self { dense_scan: true }
    }

    /// Set whether to run the dense digit scan.
    pub fn with_dense_scan(mut self, dense_scan: bool) -> Self {
        self.dense_scan = dense_scan;
        self
    }
}

impl Default for PhoneMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PhoneMatcher {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let folded = fold_digits(text);

        let mut candidates = Vec::new();
        for (pattern, confidence) in phone_patterns() {
            for m in pattern.find_iter(&folded) {
                if let Some(number) = normalize_phone(m.as_str()) {
                    candidates.push(
                        ExtractionMatch::new(number, confidence, m.as_str())
                            .with_position(m.start(), m.end()),
                    );
                }
            }
        }

        // Stable sort keeps the higher-confidence pattern first on equal starts
        candidates.sort_by_key(|c| c.position.map(|(start, _)| start));

        let mut results: Vec<ExtractionMatch<String>> = Vec::new();
        for candidate in candidates {
            if !results.iter().any(|r| r.value == candidate.value) {
                results.push(candidate);
            }
        }

        if self.dense_scan {
            for number in dense_scan(&folded) {
                if !results.iter().any(|r| r.value == number) {
                    results.push(ExtractionMatch::new(
                        number.clone(),
                        DENSE_SCAN_CONFIDENCE,
                        number,
                    ));
                }
            }
        }

        results
    }
}

/// Extract the set of canonical mobile numbers found in text.
pub fn extract_numbers(text: &str) -> BTreeSet<String> {
    PhoneMatcher::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

/// Slide an 11-digit window over the digits of `text`.
///
/// Recovers numbers broken across lines or interleaved with stray characters.
fn dense_scan(text: &str) -> Vec<String> {
    let digits: Vec<u8> = text.bytes().filter(u8::is_ascii_digit).collect();
    let mut found: Vec<String> = Vec::new();

    for window in digits.windows(11) {
        if !window.starts_with(b"01") {
            continue;
        }
        let candidate: String = window.iter().map(|&b| b as char).collect();
        if validate_phone(&candidate) && !found.contains(&candidate) {
            found.push(candidate);
        }
    }

    found
}

/// Replace Arabic-Indic and Extended Arabic-Indic digits with ASCII digits.
pub fn fold_digits(text: &str) -> Cow<'_, str> {
    let needs_folding = text.chars().any(|c| arabic_digit_value(c).is_some());
    if !needs_folding {
        return Cow::Borrowed(text);
    }

    Cow::Owned(
        text.chars()
            .map(|c| match arabic_digit_value(c) {
                Some(d) => char::from(b'0' + d),
                None => c,
            })
            .collect(),
    )
}

fn arabic_digit_value(c: char) -> Option<u8> {
    match c {
        '\u{0660}'..='\u{0669}' => Some((c as u32 - 0x0660) as u8),
        '\u{06F0}'..='\u{06F9}' => Some((c as u32 - 0x06F0) as u8),
        _ => None,
    }
}

/// Normalize a written phone number to its canonical 11-digit form.
///
/// Accepts bare numbers, separated groups, and the `+20`, `0020` and `20`
/// country-code forms. Returns `None` when the result is not a valid mobile
/// number.
pub fn normalize_phone(candidate: &str) -> Option<String> {
    let digits: String = fold_digits(candidate)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    let canonical = if digits.len() == 14 && digits.starts_with("0020") {
        format!("0{}", &digits[4..])
    } else if digits.len() == 12 && digits.starts_with("20") {
        format!("0{}", &digits[2..])
    } else if digits.len() == 10 && digits.starts_with('1') {
        format!("0{}", digits)
    } else {
        digits
    };

    validate_phone(&canonical).then_some(canonical)
}

/// Validate an Egyptian mobile number in canonical form.
///
/// Format: `01` + one of `0`, `1`, `2`, `5` + 8 digits.
pub fn validate_phone(number: &str) -> bool {
    if number.len() != 11 || !number.starts_with("01") {
        return false;
    }

    if !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    VALID_PREFIXES.contains(&&number[..3])
}

/// Format a canonical number for display (`0101 234 5678`).
pub fn format_phone(number: &str) -> String {
    if number.len() != 11 || !number.is_ascii() {
        return number.to_string();
    }

    format!("{} {} {}", &number[0..4], &number[4..7], &number[7..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(numbers: &[&str]) -> BTreeSet<String> {
        numbers.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_phone_valid() {
        assert!(validate_phone("01012345678"));
        assert!(validate_phone("01112345678"));
        assert!(validate_phone("01212345678"));
        assert!(validate_phone("01512345678"));
    }

    #[test]
    fn test_validate_phone_invalid() {
        assert!(!validate_phone("01312345678")); // Unknown prefix
        assert!(!validate_phone("0101234567")); // Too short
        assert!(!validate_phone("010123456789")); // Too long
        assert!(!validate_phone("02012345678")); // Landline
        assert!(!validate_phone("0101234567a"));
        assert!(!validate_phone(""));
    }

    #[test]
    fn test_extract_arabic_context() {
        assert_eq!(extract_numbers("رقمي 01012345678 شكرا"), set(&["01012345678"]));
    }

    #[test]
    fn test_extract_international() {
        assert_eq!(extract_numbers("tel +201098765432"), set(&["01098765432"]));
        assert_eq!(extract_numbers("call 00201512345678"), set(&["01512345678"]));
        assert_eq!(extract_numbers("201212345678"), set(&["01212345678"]));
    }

    #[test]
    fn test_extract_separated() {
        assert_eq!(extract_numbers("010-1234-5678"), set(&["01012345678"]));
        assert_eq!(extract_numbers("011 2879 4048"), set(&["01128794048"]));
    }

    #[test]
    fn test_extract_split_across_lines() {
        let text = "رقم الخط\n0112879\n4048";
        assert_eq!(extract_numbers(text), set(&["01128794048"]));
    }

    #[test]
    fn test_extract_arabic_indic_digits() {
        assert_eq!(extract_numbers("رقمي ٠١٠١٢٣٤٥٦٧٨"), set(&["01012345678"]));
        assert_eq!(extract_numbers("۰۱۵۱۲۳۴۵۶۷۸"), set(&["01512345678"]));
    }

    #[test]
    fn test_extract_no_long_digit_run() {
        assert!(extract_numbers("balance 150 EGP, valid until 2025").is_empty());
        assert!(extract_numbers("").is_empty());
    }

    #[test]
    fn test_invalid_prefix_ignored() {
        assert!(extract_numbers("01312345678").is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let text = "01512345678 / +201512345678 / 015-1234-5678";
        assert_eq!(extract_numbers(text), set(&["01512345678"]));
    }

    #[test]
    fn test_embedded_numbers_always_found() {
        let numbers = ["01000000000", "01199999999", "01255501234", "01512121212"];
        let wrappers = [
            ("", ""),
            ("x", "y"),
            ("رقم: ", " شكرا"),
            ("\n\n", "\t"),
            ("abc-", "-def"),
        ];

        for number in numbers {
            for (before, after) in wrappers {
                let text = format!("{}{}{}", before, number, after);
                let found = extract_numbers(&text);
                assert!(found.contains(number), "{:?} not found in {:?}", number, text);
            }
        }
    }

    #[test]
    fn test_extracted_numbers_are_valid() {
        let samples = [
            "0101234567801312345678",
            "+20 10 9876 5432 and 0020 11 1111 2222",
            "IMEI 356938035643809 serial 20191231012345",
            "٠١٢ ٣٤٥٦ ٧٨٩٠ / 01-5-1234-5678",
        ];

        for sample in samples {
            for number in extract_numbers(sample) {
                assert!(validate_phone(&number), "{:?} from {:?}", number, sample);
            }
        }
    }

    #[test]
    fn test_normalize_idempotent() {
        for input in ["+201098765432", "00201098765432", "201098765432", "01098765432", "1098765432"] {
            let once = normalize_phone(input).unwrap();
            assert_eq!(once, "01098765432");
            assert_eq!(normalize_phone(&once).as_deref(), Some(once.as_str()));
        }
    }

    #[test]
    fn test_normalize_rejects_invalid() {
        assert_eq!(normalize_phone("+201398765432"), None);
        assert_eq!(normalize_phone("12345"), None);
    }

    #[test]
    fn test_matches_carry_positions() {
        let text = "Vodafone: 01112345678 Orange: 01212345678";
        let matches = PhoneMatcher::new().extract_all(text);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].value, "01112345678");
        assert_eq!(matches[0].position, Some((10, 21)));
        assert_eq!(matches[1].value, "01212345678");
        assert_eq!(matches[1].position, Some((30, 41)));
    }

    #[test]
    fn test_dense_scan_disabled() {
        let text = "0112879\n4048";
        assert!(PhoneMatcher::new().with_dense_scan(false).extract_all(text).is_empty());
        assert_eq!(PhoneMatcher::new().extract_all(text).len(), 1);
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("01012345678"), "0101 234 5678");
        assert_eq!(format_phone("123"), "123");
    }
}
