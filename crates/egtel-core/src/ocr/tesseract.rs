//! Tesseract recognizer backed by `leptess`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use image::{DynamicImage, ImageFormat};
use leptess::{LepTess, Variable};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::recognizer::{RecognitionConfig, TextRecognizer};

/// Language set every sweep starts with.
const BASE_LANGUAGES: &str = "eng";

/// Recognizer holding one initialized Tesseract API per language set.
///
/// Trained data is read from [`OcrConfig::tessdata_dir`] when set, otherwise
/// from the library's compiled-in default.
pub struct TesseractEngine {
    tessdata_dir: Option<PathBuf>,
    /// Engines keyed by language string such as `ara+eng`.
    engines: Mutex<HashMap<String, LepTess>>,
    /// Outcome of initializing the base language set, computed once.
    availability: OnceLock<Result<(), String>>,
}

impl TesseractEngine {
    /// Create a recognizer from OCR configuration. No engine is initialized yet.
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            tessdata_dir: config.tessdata_dir.clone(),
            engines: Mutex::new(HashMap::new()),
            availability: OnceLock::new(),
        }
    }

    fn init(&self, languages: &str) -> Result<LepTess, OcrError> {
        let datapath = match &self.tessdata_dir {
            Some(dir) => Some(dir.to_str().ok_or_else(|| {
                OcrError::Unavailable(format!("tessdata path is not UTF-8: {}", dir.display()))
            })?),
            None => None,
        };

        let engine = LepTess::new(datapath, languages).map_err(|e| {
            OcrError::Unavailable(format!(
                "failed to initialize tesseract for '{}': {}",
                languages, e
            ))
        })?;

        info!(
            "Initialized tesseract for '{}' (tessdata: {})",
            languages,
            datapath.unwrap_or("default")
        );
        Ok(engine)
    }

    fn with_engine<T>(
        &self,
        languages: &str,
        f: impl FnOnce(&mut LepTess) -> Result<T, OcrError>,
    ) -> Result<T, OcrError> {
        let mut engines = self
            .engines
            .lock()
            .map_err(|_| OcrError::Recognition("tesseract engine lock poisoned".to_string()))?;

        let engine = match engines.entry(languages.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(self.init(languages)?),
        };

        f(engine)
    }
}

impl TextRecognizer for TesseractEngine {
    fn check_available(&self) -> Result<(), OcrError> {
        self.availability
            .get_or_init(|| {
                self.with_engine(BASE_LANGUAGES, |_| Ok(())).map_err(|e| match e {
                    OcrError::Unavailable(message) => message,
                    other => other.to_string(),
                })
            })
            .clone()
            .map_err(OcrError::Unavailable)
    }

    fn recognize(&self, image: &DynamicImage, config: &RecognitionConfig) -> Result<String, OcrError> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| OcrError::Recognition(format!("failed to encode image: {}", e)))?;

        let text = self.with_engine(&config.languages, |engine| {
            engine
                .set_variable(
                    Variable::TesseditPagesegMode,
                    &config.page_seg_mode.as_psm().to_string(),
                )
                .map_err(|e| OcrError::Recognition(format!("failed to set page mode: {}", e)))?;

            engine
                .set_image_from_mem(&png)
                .map_err(|e| OcrError::Recognition(format!("failed to load image: {}", e)))?;

            engine
                .get_utf8_text()
                .map_err(|e| OcrError::Recognition(format!("tesseract ({}): {}", config.name, e)))
        })?;

        debug!("tesseract ({}) returned {} characters", config.name, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn engine_without_data() -> (tempfile::TempDir, TesseractEngine) {
        let dir = tempfile::tempdir().unwrap();
        let engine = TesseractEngine::new(&OcrConfig {
            tessdata_dir: Some(dir.path().to_path_buf()),
        });
        (dir, engine)
    }

    #[test]
    fn test_missing_trained_data_unavailable() {
        let (_dir, engine) = engine_without_data();
        assert!(matches!(engine.check_available(), Err(OcrError::Unavailable(_))));
        // Cached result is reported again
        assert!(matches!(engine.check_available(), Err(OcrError::Unavailable(_))));
    }

    #[test]
    fn test_recognize_without_trained_data() {
        let (_dir, engine) = engine_without_data();
        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let result = engine.recognize(&image, &RecognitionConfig::binarized_fallback());
        assert!(matches!(result, Err(OcrError::Unavailable(_))));
    }

    #[test]
    fn test_failed_init_not_cached() {
        let (_dir, engine) = engine_without_data();
        let _ = engine.check_available();
        assert!(engine.engines.lock().unwrap().is_empty());
    }
}
