//! Validate command - check a single invoice file.

use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use aduana_core::{BatchEntry, ValidationOutcome};

use super::{blocking, build_validator, load_config, read_json};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Invoice JSON file (flexible or fixed layout)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Evaluation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text report
    Text,
}

#[derive(Serialize)]
struct Report<'a> {
    invoice_number: &'a str,
    #[serde(flatten)]
    outcome: &'a ValidationOutcome,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>, ai: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let document = read_json(&args.input)?;
    if document.is_array() {
        anyhow::bail!(
            "{} holds several invoices; use `aduana batch` instead",
            args.input.display()
        );
    }

    info!("Validating {}", args.input.display());
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());

    let entry = blocking(move || {
        let validator = build_validator(&config, ai)?;
        let report = validator.evaluate_batch_json_at(&document, today);
        report
            .invoices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No invoice evaluated"))
    })
    .await?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&Report {
            invoice_number: &entry.invoice_number,
            outcome: &entry.outcome,
        })?,
        OutputFormat::Text => format_text(&entry),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_text(entry: &BatchEntry) -> String {
    let outcome = &entry.outcome;
    let mut output = String::new();

    let verdict = if outcome.compliant {
        style("COMPLIANT").green().to_string()
    } else {
        style("REJECTED").red().to_string()
    };
    output.push_str(&format!("Invoice {}: {}\n", entry.invoice_number, verdict));

    for (title, findings) in [("Errors", &outcome.errors), ("Warnings", &outcome.warnings)] {
        if findings.is_empty() {
            continue;
        }
        output.push_str(&format!("\n{} ({}):\n", title, findings.len()));
        for finding in findings {
            let code = finding.code.map(|c| format!("[{c}] ")).unwrap_or_default();
            output.push_str(&format!("  {}{}: {}\n", code, finding.field, finding.message));
        }
    }

    if !outcome.suggestions.is_empty() {
        output.push_str("\nSuggestions:\n");
        for suggestion in &outcome.suggestions {
            output.push_str(&format!("  - {}\n", suggestion));
        }
    }

    if let Some(advisory) = &outcome.advisory {
        let coherent = match advisory.coherent {
            Some(true) => "coherent",
            Some(false) => "incoherent",
            None => "undetermined",
        };
        output.push_str(&format!("\nAdvisory review: {}\n", coherent));
    }

    output
}
