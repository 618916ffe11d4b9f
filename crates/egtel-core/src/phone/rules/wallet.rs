//! Mobile-wallet mention detection.

/// Generic and brand-specific wallet keywords.
const WALLET_KEYWORDS: &[&str] = &[
    "wallet",
    "محفظة",
    "محفظه",
    "فودافون كاش",
    "vodafone cash",
    "orange cash",
    "اورانج كاش",
    "أورانج كاش",
    "instapay",
    "انستاباي",
    "فوري",
    "fawry",
    "ايزي پاي",
    "easy pay",
    "كاش",
];

/// Whether `text` mentions a mobile wallet (case-insensitive substring match).
///
/// The flag covers the whole text block; it cannot be tied to one number
/// among several found in the same text.
pub fn has_wallet_mention(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    let lowered = text.to_lowercase();
    WALLET_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(&keyword.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        assert!(has_wallet_mention("WALLET"));
        assert!(has_wallet_mention("Wallet"));
        assert!(has_wallet_mention("wallet"));
        assert!(has_wallet_mention("Pay with InstaPay"));
    }

    #[test]
    fn test_arabic_keywords() {
        assert!(has_wallet_mention("محفظة فودافون كاش 01012345678"));
        assert!(has_wallet_mention("ادفع عن طريق فوري"));
    }

    #[test]
    fn test_no_mention() {
        assert!(!has_wallet_mention(""));
        assert!(!has_wallet_mention("Vodafone 01012345678"));
        assert!(!has_wallet_mention("رصيدك الحالي 25 جنيه"));
    }
}
