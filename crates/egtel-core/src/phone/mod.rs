//! Phone number extraction.
//!
//! [`rules`] holds the text-level matchers; [`PhoneExtractor`] drives them
//! across preprocessing variants and recognition configs.

mod extractor;
pub mod rules;

pub use extractor::{
    excerpt, process_text, records_from_text, AttemptOutcome, AttemptReport, Extraction,
    ExtractionStage, PhoneExtractor,
};
