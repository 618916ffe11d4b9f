//! Extraction orchestrator: preprocessing variants × recognition configs.

use std::time::Instant;

use chrono::{DateTime, Utc};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::config::{EgtelConfig, ExtractionConfig, PreprocessConfig};
use crate::models::phone::PhoneRecord;
use crate::ocr::{
    ImagePreprocessor, ImageSource, PreprocessingVariant, RecognitionConfig, TextRecognizer,
};

use super::rules::{
    classify, classify_by_keywords, fold_digits, has_wallet_mention, normalize_phone,
    FieldExtractor, PhoneMatcher,
};

/// Which step of the pipeline produced the records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionStage {
    /// The enhanced image, with the named recognition config.
    Enhanced { config: String },
    /// The binarized image.
    Binarized,
    /// The configured manual fallback records.
    ManualFallback,
    /// Nothing was found.
    Empty,
}

/// Outcome of a single recognition pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The engine returned no text.
    EmptyText,
    /// Text was returned but contained no valid number.
    NoNumbers,
    /// Valid numbers were found.
    Found { count: usize },
    /// The pass failed and was skipped.
    Failed { error: String },
}

/// One (variant, config) pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptReport {
    pub variant: PreprocessingVariant,
    pub config: String,
    pub outcome: AttemptOutcome,
}

/// Result of extracting phone numbers from one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Records sorted by phone number, unique per number.
    pub records: Vec<PhoneRecord>,
    /// Step that produced the records.
    pub stage: ExtractionStage,
    /// Every recognition pass that ran, in order.
    pub attempts: Vec<AttemptReport>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
    /// When the extraction finished.
    pub extracted_at: DateTime<Utc>,
}

impl Extraction {
    /// Whether no record was produced.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Extracts phone records from images using a text recognizer.
///
/// Stateless between calls; each call runs the full sweep on the calling
/// thread.
pub struct PhoneExtractor<R: TextRecognizer> {
    recognizer: R,
    preprocessor: ImagePreprocessor,
    config: ExtractionConfig,
}

impl<R: TextRecognizer> PhoneExtractor<R> {
    /// Create an extractor with default settings.
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            preprocessor: ImagePreprocessor::new(),
            config: ExtractionConfig::default(),
        }
    }

    /// Create an extractor from the full configuration.
    pub fn from_config(recognizer: R, config: &EgtelConfig) -> Self {
        Self::new(recognizer)
            .with_preprocess_config(config.preprocessing.clone())
            .with_config(config.extraction.clone())
    }

    /// Set preprocessing configuration.
    pub fn with_preprocess_config(mut self, config: PreprocessConfig) -> Self {
        self.preprocessor = ImagePreprocessor::new().with_config(config);
        self
    }

    /// Set extraction configuration.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// The wrapped recognizer.
    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// Extract phone records from an image.
    ///
    /// Errors only when the recognizer is unavailable or there is no usable
    /// image. Finding nothing yields an empty [`Extraction`].
    pub fn extract(&self, source: impl Into<ImageSource>) -> Result<Extraction> {
        let start = Instant::now();

        self.recognizer.check_available()?;
        let image = source.into().load()?;

        info!("Extracting phone numbers from {}x{} image", image.width(), image.height());

        let mut attempts = Vec::new();

        let enhanced = self.preprocessor.preprocess(&image, PreprocessingVariant::Enhanced);
        for config in RecognitionConfig::sweep() {
            if let Some(records) =
                self.attempt(&enhanced, PreprocessingVariant::Enhanced, &config, &mut attempts)
            {
                let stage = ExtractionStage::Enhanced { config: config.name };
                return Ok(self.finish(records, stage, attempts, start));
            }
        }

        debug!("No number from enhanced image, trying binarized image");
        let binarized = self.preprocessor.preprocess(&image, PreprocessingVariant::Binarize);
        let config = RecognitionConfig::binarized_fallback();
        if let Some(records) =
            self.attempt(&binarized, PreprocessingVariant::Binarize, &config, &mut attempts)
        {
            return Ok(self.finish(records, ExtractionStage::Binarized, attempts, start));
        }

        let manual = self.manual_fallback_records();
        if !manual.is_empty() {
            warn!("No number recognized, emitting {} manual fallback records", manual.len());
            return Ok(self.finish(manual, ExtractionStage::ManualFallback, attempts, start));
        }

        Ok(self.finish(Vec::new(), ExtractionStage::Empty, attempts, start))
    }

    /// Build records from already-recognized text.
    pub fn process_text(&self, text: &str) -> Vec<PhoneRecord> {
        records_from_text(text, self.config.text_excerpt_chars)
    }

    fn attempt(
        &self,
        image: &DynamicImage,
        variant: PreprocessingVariant,
        config: &RecognitionConfig,
        attempts: &mut Vec<AttemptReport>,
    ) -> Option<Vec<PhoneRecord>> {
        let (outcome, records) = match self.recognizer.recognize(image, config) {
            Ok(text) if text.trim().is_empty() => {
                debug!("{} / {}: empty text", variant.name(), config.name);
                (AttemptOutcome::EmptyText, None)
            }
            Ok(text) => {
                let records = records_from_text(&text, self.config.excerpt_chars);
                debug!(
                    "{} / {}: {} numbers in {} characters",
                    variant.name(),
                    config.name,
                    records.len(),
                    text.len()
                );
                if records.is_empty() {
                    (AttemptOutcome::NoNumbers, None)
                } else {
                    (AttemptOutcome::Found { count: records.len() }, Some(records))
                }
            }
            Err(e) => {
                warn!("{} / {} failed: {}", variant.name(), config.name, e);
                (AttemptOutcome::Failed { error: e.to_string() }, None)
            }
        };

        attempts.push(AttemptReport {
            variant,
            config: config.name.clone(),
            outcome,
        });

        records
    }

    fn manual_fallback_records(&self) -> Vec<PhoneRecord> {
        let fallback = &self.config.manual_fallback;
        if !fallback.enabled {
            return Vec::new();
        }

        let mut records: Vec<PhoneRecord> = Vec::new();
        for number in fallback.numbers.iter().filter_map(|n| normalize_phone(n)) {
            if records.iter().any(|r| r.phone_number == number) {
                continue;
            }
            records.push(PhoneRecord {
                phone_number: number,
                carrier: fallback.carrier,
                has_wallet: false,
                source_text_excerpt: fallback.note.clone(),
            });
        }
        records
    }

    fn finish(
        &self,
        mut records: Vec<PhoneRecord>,
        stage: ExtractionStage,
        attempts: Vec<AttemptReport>,
        start: Instant,
    ) -> Extraction {
        records.sort_by(|a, b| a.phone_number.cmp(&b.phone_number));

        let extraction = Extraction {
            records,
            stage,
            attempts,
            processing_time_ms: start.elapsed().as_millis() as u64,
            extracted_at: Utc::now(),
        };

        info!(
            "Extraction finished: {} records ({:?}) after {} passes in {}ms",
            extraction.records.len(),
            extraction.stage,
            extraction.attempts.len(),
            extraction.processing_time_ms
        );

        extraction
    }
}

/// Build phone records from one block of recognized text.
///
/// A number's carrier comes from the keywords next to it, then from
/// [`classify`] over the whole text. Keywords are read on the side the text
/// labels numbers: before them when a keyword precedes the first number,
/// otherwise after them when one follows the last number. The wallet flag is
/// shared by every record of the block.
pub fn records_from_text(text: &str, excerpt_chars: usize) -> Vec<PhoneRecord> {
    let folded = fold_digits(text);
    let matches = PhoneMatcher::new().extract_all(&folded);
    if matches.is_empty() {
        return Vec::new();
    }

    let has_wallet = has_wallet_mention(text);
    let source_text_excerpt = excerpt(text, excerpt_chars);

    let spans: Vec<(usize, usize)> = matches.iter().filter_map(|m| m.position).collect();
    let side = keyword_side(&folded, &spans);

    // Positioned matches come first, in text order
    let mut index = 0;
    matches
        .into_iter()
        .map(|m| {
            let local = m.position.and_then(|_| {
                let segment = side.map(|side| keyword_segment(&folded, &spans, index, side));
                index += 1;
                segment.and_then(classify_by_keywords)
            });
            let carrier = local.unwrap_or_else(|| classify(&folded, &m.value));

            PhoneRecord {
                phone_number: m.value,
                carrier,
                has_wallet,
                source_text_excerpt: source_text_excerpt.clone(),
            }
        })
        .collect()
}

/// Where carrier keywords sit relative to the numbers they name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeywordSide {
    Before,
    After,
}

fn keyword_side(folded: &str, spans: &[(usize, usize)]) -> Option<KeywordSide> {
    let (first, last) = (spans.first()?, spans.last()?);

    if classify_by_keywords(&folded[..first.0]).is_some() {
        Some(KeywordSide::Before)
    } else if classify_by_keywords(&folded[last.1..]).is_some() {
        Some(KeywordSide::After)
    } else {
        None
    }
}

/// Text between the number at `index` and its neighbour on `side`.
fn keyword_segment<'a>(
    folded: &'a str,
    spans: &[(usize, usize)],
    index: usize,
    side: KeywordSide,
) -> &'a str {
    let (start, end) = spans[index];
    match side {
        KeywordSide::Before => {
            let from = index.checked_sub(1).map_or(0, |prev| spans[prev].1);
            &folded[from.min(start)..start]
        }
        KeywordSide::After => {
            let to = spans.get(index + 1).map_or(folded.len(), |next| next.0);
            &folded[end..to.max(end)]
        }
    }
}

/// Build phone records from text with the default excerpt length.
pub fn process_text(text: &str) -> Vec<PhoneRecord> {
    records_from_text(text, ExtractionConfig::default().text_excerpt_chars)
}

/// First `max_chars` characters of `text`, with `...` when truncated.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
