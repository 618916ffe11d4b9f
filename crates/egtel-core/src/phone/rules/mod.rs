//! Rule-based extractors for Egyptian phone numbers and their attribution.

pub mod carrier;
pub mod customer;
pub mod numbers;
pub mod patterns;
pub mod wallet;

pub use carrier::{classify, classify_by_keywords, classify_by_prefix};
pub use customer::{extract_customer_info, extract_national_id, validate_national_id};
pub use numbers::{
    extract_numbers, fold_digits, format_phone, normalize_phone, validate_phone, PhoneMatcher,
};
pub use wallet::has_wallet_mention;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte span in the source text, when the match maps to one.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
