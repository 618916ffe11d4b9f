//! Batch command - phone numbers from many screenshots.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use egtel_core::{EgtelError, Extraction, PhoneExtractor, TesseractEngine, TextRecognizer};

use super::extract::explain_error;
use super::{describe_stage, format_extraction, format_text, load_config, OutputFormat};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input screenshots
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Emit the configured manual fallback numbers when nothing is recognized
    #[arg(long)]
    manual_fallback: bool,

    /// Directory holding tesseract trained data (`*.traineddata`)
    #[arg(long)]
    tessdata: Option<PathBuf>,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    extraction: Option<Extraction>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(tessdata) = args.tessdata.clone() {
        config.ocr.tessdata_dir = Some(tessdata);
    }
    if args.manual_fallback {
        config.extraction.manual_fallback.enabled = true;
    }

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_image(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching images found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} images to process",
        style("ℹ").blue(),
        files.len()
    );

    let extractor = Arc::new(PhoneExtractor::from_config(
        TesseractEngine::new(&config.ocr),
        &config,
    ));

    // A missing engine fails every file the same way
    extractor
        .recognizer()
        .check_available()
        .map_err(|e| explain_error(e.into()))?;

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let worker = Arc::clone(&extractor);
        let input = path.clone();
        let outcome: Result<Extraction, EgtelError> =
            tokio::task::spawn_blocking(move || worker.extract(input)).await?;

        match outcome {
            Ok(extraction) => {
                results.push(FileResult {
                    path,
                    extraction: Some(extraction),
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        extraction: None,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Processing {} failed: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    for result in &results {
        let Some(extraction) = &result.extraction else {
            continue;
        };

        match &args.output_dir {
            Some(output_dir) => {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("screenshot");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_extraction(extraction, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
            None => {
                println!(
                    "{} ({})",
                    result.path.display(),
                    describe_stage(&extraction.stage)
                );
                print!("{}", format_text(&extraction.records));
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let numbers: usize = results
        .iter()
        .filter_map(|r| r.extraction.as_ref())
        .map(|e| e.records.len())
        .sum();

    eprintln!();
    eprintln!(
        "{} Processed {} images in {:?}, {} phone numbers",
        style("✓").green(),
        results.len(),
        start.elapsed(),
        numbers
    );
    eprintln!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed images:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "stage",
        "phone_count",
        "phone_numbers",
        "carriers",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(extraction) = &result.extraction {
            let numbers: Vec<&str> = extraction
                .records
                .iter()
                .map(|r| r.phone_number.as_str())
                .collect();
            let carriers: Vec<&str> = extraction.records.iter().map(|r| r.carrier.name()).collect();

            wtr.write_record([
                filename,
                "success",
                &describe_stage(&extraction.stage),
                &extraction.records.len().to_string(),
                &numbers.join(";"),
                &carriers.join(";"),
                &extraction.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "0",
                "",
                "",
                "",
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
