//! Core library for extracting Egyptian mobile numbers from screenshots.
//!
//! This crate provides:
//! - Image preprocessing variants (enhanced grayscale, binarized)
//! - A text recognition seam with a Tesseract backend
//! - Phone number matching, normalization and validation
//! - Carrier and mobile wallet attribution
//! - A persistence contract for the extracted records

pub mod error;
pub mod models;
pub mod ocr;
pub mod phone;
pub mod store;

pub use error::{EgtelError, OcrError, Result, StoreError};
pub use models::config::EgtelConfig;
pub use models::phone::{Carrier, CustomerInfo, PhoneRecord};
pub use ocr::{ImagePreprocessor, ImageSource, PreprocessingVariant, RecognitionConfig, TextRecognizer};
#[cfg(feature = "tesseract")]
pub use ocr::TesseractEngine;
pub use phone::{process_text, Extraction, ExtractionStage, PhoneExtractor};
pub use store::{import_records, ImportReport, MemoryStore, PhoneStore};
