//! Process command - extract a record from a single document.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use dataconv_core::{DocumentTextExtractor, ExtractionPipeline};

use super::output::{format_records, NamedRecord, OutputFormat};
use super::{load_config, warn_unknown_category};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input document (PDF, image, or extracted .txt)
    #[arg(required = true)]
    input: PathBuf,

    /// Product category used for filtering
    #[arg(short = 'C', long, default_value = "chemicals")]
    category: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the detected language and extraction mode
    #[arg(long)]
    show_language: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    warn_unknown_category(&config, &args.category);

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pipeline = ExtractionPipeline::from_config(&config);
    let extractor = DocumentTextExtractor::new(config.ocr.clone());
    let run = pipeline.run(&extractor, &args.input, &args.category)?;

    let records = [NamedRecord {
        file: file_label(&args.input),
        record: run.record,
    }];
    let output = format_records(&records, args.format)?;

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

    if args.show_language {
        eprintln!(
            "{} Language: {} (mode {}{}), {}ms",
            style("ℹ").blue(),
            run.language,
            run.mode,
            if run.re_extracted { ", re-extracted" } else { "" },
            run.processing_time_ms
        );
    }

    Ok(())
}

/// File name shown in exported rows.
pub fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
