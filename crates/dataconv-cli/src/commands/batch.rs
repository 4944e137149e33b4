//! Batch processing command for multiple documents.
//!
//! Documents are processed one after another. A failing document is reported
//! with its name and error and does not stop the rest of the batch unless
//! `--fail-fast` is given.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use dataconv_core::{DocumentKind, DocumentTextExtractor, ExtractionPipeline};

use super::output::{format_failures, format_records, NamedRecord, OutputFormat};
use super::process::file_label;
use super::{load_config, warn_unknown_category};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files as a glob pattern (e.g. "scans/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Product category used for filtering
    #[arg(short = 'C', long, default_value = "chemicals")]
    category: String,

    /// Output file for all records (default: stdout)
    #[arg(short, long, conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Directory for a timestamped output file
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Write failed documents and their errors to this CSV file
    #[arg(long)]
    errors: Option<PathBuf>,

    /// Stop at the first failing document
    #[arg(long)]
    fail_fast: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    warn_unknown_category(&config, &args.category);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && DocumentKind::from_path(p).is_some())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching documents found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        files.len()
    );

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let pipeline = ExtractionPipeline::from_config(&config);
    let extractor = DocumentTextExtractor::new(config.ocr.clone());

    let mut records = Vec::with_capacity(files.len());
    let mut failures: Vec<(String, String)> = Vec::new();

    for (path, label) in files.iter().zip(document_labels(&files)) {
        progress.set_message(label.clone());

        match pipeline.run(&extractor, path, &args.category) {
            Ok(run) => {
                debug!(
                    "{}: language {}, mode {}, {}ms",
                    label, run.language, run.mode, run.processing_time_ms
                );
                records.push(NamedRecord {
                    file: label,
                    record: run.record,
                });
            }
            Err(e) if args.fail_fast => {
                progress.abandon();
                error!("Failed to process {}: {}", path.display(), e);
                anyhow::bail!("Processing failed for {}: {}", label, e);
            }
            Err(e) => {
                warn!("Failed to process {}: {}", path.display(), e);
                failures.push((label, e.to_string()));
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    let output = format_records(&records, args.format)?;
    match output_path(&args) {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &output)?;
            eprintln!(
                "{} Records written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => print!("{}", output),
    }

    if let Some(errors_path) = &args.errors {
        fs::write(errors_path, format_failures(&failures)?)?;
        debug!("Wrote failure report to {}", errors_path.display());
    }

    eprintln!(
        "{} Processed {} documents in {:?}: {} successful, {} failed",
        style("✓").green(),
        files.len(),
        start.elapsed(),
        style(records.len()).green(),
        style(failures.len()).red()
    );

    if !failures.is_empty() {
        eprintln!("{}", style("Failed documents:").red());
        for (file, error) in &failures {
            eprintln!("  - {}: {}", file, error);
        }
    }

    Ok(())
}

/// Row labels: the file name, or the full path when file names collide.
fn document_labels(files: &[PathBuf]) -> Vec<String> {
    let names: Vec<String> = files.iter().map(|path| file_label(path)).collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in &names {
        *counts.entry(name.as_str()).or_default() += 1;
    }

    files
        .iter()
        .zip(&names)
        .map(|(path, name)| match counts.get(name.as_str()) {
            Some(&count) if count > 1 => path.display().to_string(),
            _ => name.clone(),
        })
        .collect()
}

fn output_path(args: &BatchArgs) -> Option<PathBuf> {
    if let Some(path) = &args.output {
        return Some(path.clone());
    }
    args.output_dir
        .as_deref()
        .map(|dir| timestamped_output(dir, args.format))
}

fn timestamped_output(dir: &Path, format: OutputFormat) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("dataconv_{}.{}", stamp, format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_use_paths_only_for_colliding_names() {
        let files = vec![
            PathBuf::from("docs/a/card.pdf"),
            PathBuf::from("docs/b/card.pdf"),
            PathBuf::from("docs/b/acme.txt"),
        ];
        let expected = vec![
            Path::new("docs/a/card.pdf").display().to_string(),
            Path::new("docs/b/card.pdf").display().to_string(),
            "acme.txt".to_string(),
        ];
        assert_eq!(document_labels(&files), expected);
    }

    #[test]
    fn test_timestamped_output_name() {
        let path = timestamped_output(Path::new("out"), OutputFormat::Csv);
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("dataconv_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(path.parent(), Some(Path::new("out")));
    }
}
