//! Text command - phone numbers and customer details from recognized text.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;

use egtel_core::phone::records_from_text;
use egtel_core::phone::rules::extract_customer_info;
use egtel_core::{CustomerInfo, PhoneRecord};

use super::{format_csv, format_text, load_config, read_text, OutputFormat};

/// Arguments for the text command.
#[derive(Args)]
pub struct TextArgs {
    /// Text file, or `-` to read stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct TextReport {
    customer: CustomerInfo,
    records: Vec<PhoneRecord>,
}

pub async fn run(args: TextArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let text = read_text(&args.input)?;

    let report = TextReport {
        customer: extract_customer_info(&text),
        records: records_from_text(&text, config.extraction.text_excerpt_chars),
    };

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Csv => format_csv(&report.records)?,
        OutputFormat::Text => format_report_text(&report),
    };

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

    Ok(())
}

fn format_report_text(report: &TextReport) -> String {
    let mut output = String::new();

    if let Some(name) = &report.customer.name {
        output.push_str(&format!("Customer: {}\n", name));
    }
    if let Some(national_id) = &report.customer.national_id {
        output.push_str(&format!("National ID: {}\n", national_id));
    }
    if !report.customer.is_empty() {
        output.push('\n');
    }

    output.push_str(&format!("{} phone numbers\n", report.records.len()));
    output.push_str(&format_text(&report.records));
    output
}
