//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod text;

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use egtel_core::models::config::EgtelConfig;
use egtel_core::phone::rules::format_phone;
use egtel_core::{Extraction, ExtractionStage, ImageSource, PhoneRecord};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("egtel")
        .join("config.json")
}

/// Load configuration from `--config`, the default file, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<EgtelConfig> {
    if let Some(path) = config_path {
        return EgtelConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(EgtelConfig::from_file(&path)?)
    } else {
        Ok(EgtelConfig::default())
    }
}

/// Image source for a path argument, where `-` reads stdin.
pub fn image_source(input: &Path) -> anyhow::Result<ImageSource> {
    if input == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes)?;
        Ok(ImageSource::Bytes(bytes))
    } else {
        Ok(ImageSource::File(input.to_path_buf()))
    }
}

/// Read a text argument, where `-` reads stdin.
pub fn read_text(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input.display(), e))
    }
}

pub fn describe_stage(stage: &ExtractionStage) -> String {
    match stage {
        ExtractionStage::Enhanced { config } => format!("enhanced image, {}", config),
        ExtractionStage::Binarized => "binarized image".to_string(),
        ExtractionStage::ManualFallback => "manual fallback".to_string(),
        ExtractionStage::Empty => "nothing found".to_string(),
    }
}

pub fn format_extraction(extraction: &Extraction, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(extraction)?),
        OutputFormat::Csv => format_csv(&extraction.records),
        OutputFormat::Text => {
            let mut output = format!(
                "{} phone numbers ({}) in {}ms\n",
                extraction.records.len(),
                describe_stage(&extraction.stage),
                extraction.processing_time_ms
            );
            output.push_str(&format_text(&extraction.records));
            Ok(output)
        }
    }
}

pub fn format_csv(records: &[PhoneRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["phone_number", "carrier", "has_wallet", "source_text_excerpt"])?;

    for record in records {
        wtr.write_record([
            record.phone_number.as_str(),
            record.carrier.name(),
            if record.has_wallet { "true" } else { "false" },
            record.source_text_excerpt.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(records: &[PhoneRecord]) -> String {
    let mut output = String::new();

    for record in records {
        output.push_str(&format!(
            "  {}  {:<9} {}{}\n",
            format_phone(&record.phone_number),
            record.carrier.name(),
            record.carrier.arabic_name(),
            if record.has_wallet { "  [wallet]" } else { "" }
        ));
    }

    output
}
