//! Error types for the egtel-core library.

use thiserror::Error;

/// Main error type for the egtel library.
#[derive(Error, Debug)]
pub enum EgtelError {
    /// OCR pipeline error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Persistence error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file.
    #[error("configuration error: {0}")]
    Config(String),
}

impl EgtelError {
    /// Whether this error means the recognition engine is not installed or
    /// could not be started.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, EgtelError::Ocr(OcrError::Unavailable(_)))
    }

    /// Whether this error means there was no image to work on.
    pub fn is_no_input(&self) -> bool {
        matches!(self, EgtelError::Ocr(OcrError::NoInput(_)))
    }
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The recognition engine could not be initialized.
    #[error("text recognition unavailable: {0}")]
    Unavailable(String),

    /// No source image (empty clipboard, unreadable or undecodable file).
    #[error("no input image: {0}")]
    NoInput(String),

    /// A single recognition pass failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors raised by a phone store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The customer national ID is unknown to the store.
    #[error("customer not found: {0}")]
    CustomerNotFound(String),

    /// The customer already exists.
    #[error("customer already exists: {0}")]
    CustomerExists(String),

    /// The national ID is malformed.
    #[error("invalid national ID: {0}")]
    InvalidNationalId(String),

    /// The phone number is not a valid Egyptian mobile number.
    #[error("invalid phone number: {0}")]
    InvalidNumber(String),

    /// The (customer, carrier, number) triple is already stored.
    #[error("phone number {number} already registered for customer {customer_id}")]
    Duplicate { customer_id: String, number: String },
}

/// Result type for the egtel library.
pub type Result<T> = std::result::Result<T, EgtelError>;
