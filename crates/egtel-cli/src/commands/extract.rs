//! Extract command - phone numbers from a single screenshot.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use egtel_core::models::config::EgtelConfig;
use egtel_core::{EgtelError, Extraction, PhoneExtractor, TesseractEngine};

use super::{describe_stage, format_extraction, image_source, load_config, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Screenshot file, or `-` to read image bytes from stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Emit the configured manual fallback numbers when nothing is recognized
    #[arg(long)]
    manual_fallback: bool,

    /// Directory holding tesseract trained data (`*.traineddata`)
    #[arg(long)]
    tessdata: Option<PathBuf>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(tessdata) = args.tessdata.clone() {
        config.ocr.tessdata_dir = Some(tessdata);
    }
    if args.manual_fallback {
        config.extraction.manual_fallback.enabled = true;
    }

    info!("Extracting phone numbers from {}", args.input.display());
    let source = image_source(&args.input)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message("Recognizing text...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = tokio::task::spawn_blocking(move || run_extraction(&config, source)).await?;
    spinner.finish_and_clear();

    let extraction = result.map_err(explain_error)?;

    let output = format_extraction(&extraction, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if extraction.is_empty() {
        eprintln!("{} No phone numbers found", style("ℹ").blue());
    } else {
        eprintln!(
            "{} {} phone numbers ({})",
            style("✓").green(),
            extraction.records.len(),
            describe_stage(&extraction.stage)
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Run the full extraction on the current thread.
pub fn run_extraction(
    config: &EgtelConfig,
    source: egtel_core::ImageSource,
) -> Result<Extraction, EgtelError> {
    let extractor = PhoneExtractor::from_config(TesseractEngine::new(&config.ocr), config);
    extractor.extract(source)
}

/// Add a hint to errors the user can act on.
pub fn explain_error(error: EgtelError) -> anyhow::Error {
    if error.is_unavailable() {
        anyhow::anyhow!(
            "{}\n\nInstall tesseract with the eng and ara trained data, or point to \
             the data with 'egtel config set ocr.tessdata_dir <DIR>' or --tessdata <DIR>.",
            error
        )
    } else {
        error.into()
    }
}
