//! Text recognition seam and the configuration sweep.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Tesseract page segmentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSegMode {
    /// Assume a single uniform block of text.
    SingleBlock,
    /// Treat the image as a single text line.
    SingleLine,
    /// Treat the image as a single word.
    SingleWord,
    /// Raw line, bypassing engine-specific hacks.
    RawLine,
}

impl PageSegMode {
    /// Numeric `--psm` value.
    pub fn as_psm(&self) -> u8 {
        match self {
            PageSegMode::SingleBlock => 6,
            PageSegMode::SingleLine => 7,
            PageSegMode::SingleWord => 8,
            PageSegMode::RawLine => 13,
        }
    }
}

/// A named text-recognition configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Short name used in logs and reports.
    pub name: String,
    /// Language set, `+`-separated (e.g. `ara+eng`).
    pub languages: String,
    /// Page segmentation mode.
    pub page_seg_mode: PageSegMode,
}

impl RecognitionConfig {
    pub fn new(name: &str, languages: &str, page_seg_mode: PageSegMode) -> Self {
        Self {
            name: name.to_string(),
            languages: languages.to_string(),
            page_seg_mode,
        }
    }

    /// Configurations tried, in order, against the enhanced image.
    pub fn sweep() -> Vec<RecognitionConfig> {
        vec![
            Self::new("eng-block", "eng", PageSegMode::SingleBlock),
            Self::new("eng-word", "eng", PageSegMode::SingleWord),
            Self::new("eng-line", "eng", PageSegMode::SingleLine),
            Self::new("ara+eng-block", "ara+eng", PageSegMode::SingleBlock),
            Self::new("eng-raw-line", "eng", PageSegMode::RawLine),
        ]
    }

    /// The single configuration run against the binarized image.
    pub fn binarized_fallback() -> RecognitionConfig {
        Self::new("eng-word", "eng", PageSegMode::SingleWord)
    }
}

/// An external text-recognition capability.
pub trait TextRecognizer {
    /// Check that the engine can be used at all.
    ///
    /// Errors here are reported to the caller as
    /// [`OcrError::Unavailable`] before any extraction is attempted.
    fn check_available(&self) -> Result<(), OcrError> {
        Ok(())
    }

    /// Recognize text in an image using one configuration.
    fn recognize(&self, image: &DynamicImage, config: &RecognitionConfig) -> Result<String, OcrError>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    fn check_available(&self) -> Result<(), OcrError> {
        (**self).check_available()
    }

    fn recognize(&self, image: &DynamicImage, config: &RecognitionConfig) -> Result<String, OcrError> {
        (**self).recognize(image, config)
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Box<T> {
    fn check_available(&self) -> Result<(), OcrError> {
        (**self).check_available()
    }

    fn recognize(&self, image: &DynamicImage, config: &RecognitionConfig) -> Result<String, OcrError> {
        (**self).recognize(image, config)
    }
}
