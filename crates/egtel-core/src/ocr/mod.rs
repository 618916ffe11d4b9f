//! OCR stage: image sources, preprocessing and the recognition engine seam.

mod preprocessing;
mod recognizer;
mod source;
#[cfg(feature = "tesseract")]
mod tesseract;

pub use preprocessing::{ImagePreprocessor, PreprocessingVariant};
pub use recognizer::{PageSegMode, RecognitionConfig, TextRecognizer};
pub use source::ImageSource;
#[cfg(feature = "tesseract")]
pub use tesseract::TesseractEngine;
