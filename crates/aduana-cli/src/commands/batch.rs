//! Batch command - validate many invoice files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Local, NaiveDate};
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use aduana_core::{BatchReport, Validator};

use super::{blocking, build_validator, load_config, read_json};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern; each file holds one invoice or an array of them
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file reports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of invoices evaluated concurrently (defaults to config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Continue when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,

    /// Evaluation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    report: Option<BatchReport>,
    error: Option<String>,
}

/// One row of the summary CSV.
#[derive(Serialize)]
struct SummaryRow<'a> {
    filename: &'a str,
    index: Option<usize>,
    invoice_number: &'a str,
    status: &'a str,
    errors: usize,
    warnings: usize,
    codes: String,
    error: &'a str,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>, ai: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to validate",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let jobs = args.jobs;
    let continue_on_error = args.continue_on_error;

    let results = blocking(move || {
        let mut validator = build_validator(&config, ai)?;
        if let Some(jobs) = jobs {
            validator = validator.with_jobs(jobs);
        }
        validate_files(files, &validator, today, continue_on_error)
    })
    .await?;

    for result in &results {
        if let (Some(report), Some(output_dir)) = (&result.report, &args.output_dir) {
            let stem = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("invoices");
            let output_path = output_dir.join(format!("{}.report.json", stem));
            fs::write(&output_path, serde_json::to_string_pretty(report)?)?;
            debug!("Wrote report to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let (total, approved) = results
        .iter()
        .filter_map(|r| r.report.as_ref())
        .fold((0, 0), |(total, approved), report| {
            (total + report.summary.total, approved + report.summary.approved)
        });
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Validated {} invoices from {} files in {:?}",
        style("✓").green(),
        total,
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} approved, {} rejected",
        style(approved).green(),
        style(total - approved).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Unreadable files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn validate_files(
    files: Vec<PathBuf>,
    validator: &Validator,
    today: NaiveDate,
    continue_on_error: bool,
) -> anyhow::Result<Vec<FileResult>> {
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        match read_json(&path) {
            Ok(document) => {
                let report = validator.evaluate_batch_json_at(&document, today);
                results.push(FileResult {
                    path,
                    report: Some(report),
                    error: None,
                });
            }
            Err(e) if continue_on_error => {
                warn!("Failed to read {}: {}", path.display(), e);
                results.push(FileResult {
                    path,
                    report: None,
                    error: Some(e.to_string()),
                });
            }
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                pb.abandon();
                anyhow::bail!("Batch aborted: {}", e);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(results)
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let Some(report) = &result.report else {
            wtr.serialize(SummaryRow {
                filename,
                index: None,
                invoice_number: "",
                status: "unreadable",
                errors: 0,
                warnings: 0,
                codes: String::new(),
                error: result.error.as_deref().unwrap_or(""),
            })?;
            continue;
        };

        for entry in &report.invoices {
            let outcome = &entry.outcome;
            let codes = outcome
                .errors
                .iter()
                .filter_map(|f| f.code)
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(";");

            wtr.serialize(SummaryRow {
                filename,
                index: Some(entry.index),
                invoice_number: &entry.invoice_number,
                status: if outcome.compliant { "approved" } else { "rejected" },
                errors: outcome.errors.len(),
                warnings: outcome.warnings.len(),
                codes,
                error: "",
            })?;
        }
    }

    wtr.flush()?;
    Ok(())
}
