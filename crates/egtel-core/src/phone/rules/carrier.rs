//! Carrier attribution from text context and number prefix.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::phone::Carrier;

/// Brand keywords per carrier, Latin and Arabic, including common misspellings.
const ORANGE_KEYWORDS: &[&str] = &[
    "orange", "اورانج", "أورانج", "اورنج", "أورنج", "mobinil", "موبينيل", "موبنيل",
];
const VODAFONE_KEYWORDS: &[&str] = &[
    "vodafone", "فودافون", "ڤودافون", "فودفون", "ڤودفون", "vf",
];
const ETISALAT_KEYWORDS: &[&str] = &[
    "etisalat", "اتصالات", "إتصالات", "اتصلات", "إتصلات", "et",
];
const WE_KEYWORDS: &[&str] = &[
    "we", "وي", "تي إي داتا", "تي اي داتا", "te data", "tedata",
];

/// Keywords this short only match as whole words.
const SHORT_KEYWORD_CHARS: usize = 3;

lazy_static! {
    static ref CARRIER_KEYWORDS: Vec<(Carrier, Regex)> = Carrier::ALL
        .iter()
        .map(|&carrier| (carrier, keyword_regex(keywords_for(carrier))))
        .collect();
}

fn keywords_for(carrier: Carrier) -> &'static [&'static str] {
    match carrier {
        Carrier::Orange => ORANGE_KEYWORDS,
        Carrier::Vodafone => VODAFONE_KEYWORDS,
        Carrier::Etisalat => ETISALAT_KEYWORDS,
        Carrier::We => WE_KEYWORDS,
    }
}

fn keyword_regex(keywords: &[&str]) -> Regex {
    let alternatives: Vec<String> = keywords
        .iter()
        .map(|keyword| {
            let escaped = regex::escape(keyword);
            if keyword.chars().count() <= SHORT_KEYWORD_CHARS {
                format!(r"\b{}\b", escaped)
            } else {
                escaped
            }
        })
        .collect();

    Regex::new(&format!("(?i)(?:{})", alternatives.join("|"))).unwrap()
}

/// Determine the carrier of `phone_number` from `text`.
///
/// Brand keywords in the text win, checked in the fixed order Orange,
/// Vodafone, Etisalat, WE. Without a keyword the number prefix decides.
pub fn classify(text: &str, phone_number: &str) -> Carrier {
    classify_by_keywords(text).unwrap_or_else(|| classify_by_prefix(phone_number))
}

/// First carrier, in precedence order, with a keyword present in `text`.
pub fn classify_by_keywords(text: &str) -> Option<Carrier> {
    CARRIER_KEYWORDS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(carrier, _)| *carrier)
}

/// Carrier from the 3-digit prefix.
///
/// The table is a simplification: 010, 011 and 012 are shared between
/// operators in practice. Malformed numbers and unknown prefixes map to
/// Orange.
pub fn classify_by_prefix(phone_number: &str) -> Carrier {
    if phone_number.len() != 11 || !phone_number.starts_with("01") {
        return Carrier::Orange;
    }

    match phone_number.get(..3) {
        Some("010") => Carrier::Orange,
        Some("011") => Carrier::Etisalat,
        Some("012") => Carrier::Orange,
        Some("015") => Carrier::We,
        _ => Carrier::Orange,
    }
}
