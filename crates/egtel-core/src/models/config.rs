//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::phone::Carrier;
use crate::error::{EgtelError, Result};

/// Main configuration for the egtel pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EgtelConfig {
    /// Recognition engine configuration.
    pub ocr: OcrConfig,

    /// Image preprocessing configuration.
    pub preprocessing: PreprocessConfig,

    /// Phone extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Recognition engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory holding `*.traineddata`; the library default when unset.
    pub tessdata_dir: Option<PathBuf>,
}

/// Image preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Images narrower than this are upscaled.
    pub min_width: u32,

    /// Images shorter than this are upscaled.
    pub min_height: u32,

    /// Contrast enhancement factor (1.0 = unchanged).
    pub contrast: f32,

    /// Brightness enhancement factor (1.0 = unchanged).
    pub brightness: f32,

    /// Sharpness enhancement factor (1.0 = unchanged).
    pub sharpness: f32,

    /// Binarization threshold; pixels above it become white.
    pub threshold: u8,

    /// Largest side an upscaled image may have.
    pub max_dimension: u32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            min_width: 800,
            min_height: 600,
            contrast: 3.0,
            brightness: 1.2,
            sharpness: 2.5,
            threshold: 128,
            max_dimension: 10_000,
        }
    }
}

/// Phone extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Length of the source excerpt attached to records from images.
    pub excerpt_chars: usize,

    /// Length of the source excerpt attached to records from plain text.
    pub text_excerpt_chars: usize,

    /// Last-resort record set emitted when every recognition pass fails.
    pub manual_fallback: ManualFallback,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            excerpt_chars: 100,
            text_excerpt_chars: 200,
            manual_fallback: ManualFallback::default(),
        }
    }
}

/// Fixed records returned when no number could be recognized.
///
/// Disabled by default. The records are attached verbatim and are not
/// derived from the image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualFallback {
    /// Emit the records at all.
    pub enabled: bool,

    /// Carrier assigned to every fallback record.
    pub carrier: Carrier,

    /// Numbers to emit; invalid entries are skipped.
    pub numbers: Vec<String>,

    /// Excerpt attached to fallback records.
    pub note: String,
}

impl Default for ManualFallback {
    fn default() -> Self {
        Self {
            enabled: false,
            carrier: Carrier::Etisalat,
            numbers: Vec::new(),
            note: "manual fallback".to_string(),
        }
    }
}

impl EgtelConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| EgtelError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| EgtelError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
