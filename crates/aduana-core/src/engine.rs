//! Evaluation engine: runs the rule catalog and merges advisory results.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::advisory::{Advisor, AdvisoryPort, CoherenceProjection};
use crate::aggregator::ResultAggregator;
use crate::error::{IngestError, Result};
use crate::ingest::{ingest, ingest_batch};
use crate::models::config::{AdvisorConfig, AduanaConfig, RulePolicy, RulesConfig};
use crate::models::outcome::{AdvisorySummary, Finding, ValidationOutcome};
use crate::models::record::{InvoiceRecord, RecordShape};
use crate::rules::{RuleContext, CATALOG};

/// Field path used for whole-invoice advisory findings.
pub const COHERENCE_FIELD: &str = "OverallCoherence";

/// Invoice number reported when none can be read.
const UNKNOWN_NUMBER: &str = "N/A";

/// Summary counts of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Percentage of compliant invoices, one decimal.
    pub approval_rate: f64,
}

/// One invoice of a batch report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Position in the input batch.
    pub index: usize,
    pub invoice_number: String,
    pub outcome: ValidationOutcome,
}

/// Result of evaluating a batch document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub invoices: Vec<BatchEntry>,
}

impl BatchReport {
    fn new(invoices: Vec<BatchEntry>) -> Self {
        let total = invoices.len();
        let approved = invoices.iter().filter(|e| e.outcome.compliant).count();
        let approval_rate = if total == 0 {
            0.0
        } else {
            (approved as f64 / total as f64 * 1000.0).round() / 10.0
        };

        Self {
            summary: BatchSummary {
                total,
                approved,
                rejected: total - approved,
                approval_rate,
            },
            invoices,
        }
    }
}

/// Commercial-invoice compliance validator.
///
/// Holds no per-evaluation state; one instance can serve any number of
/// evaluations, including concurrent ones.
#[derive(Debug, Clone)]
pub struct Validator {
    port: AdvisoryPort,
    rules: RulesConfig,
    jobs: usize,
}

impl Validator {
    /// Deterministic validator with default policies.
    pub fn new() -> Self {
        Self {
            port: AdvisoryPort::disabled(),
            rules: RulesConfig::default(),
            jobs: 4,
        }
    }

    /// Validator built from configuration.
    ///
    /// When `advisor.enabled` is set the Gemini advisor is attached; a missing
    /// API key is an error here, the caller decides whether to fall back.
    pub fn from_config(config: &AduanaConfig) -> Result<Self> {
        config.check()?;
        let validator = Self {
            port: AdvisoryPort::disabled(),
            rules: config.rules.clone(),
            jobs: config.batch.jobs,
        };

        if config.advisor.enabled {
            validator.attach_configured_advisor(&config.advisor)
        } else {
            Ok(validator)
        }
    }

    #[cfg(feature = "advisor")]
    fn attach_configured_advisor(self, config: &AdvisorConfig) -> Result<Self> {
        let advisor = crate::advisory::GeminiAdvisor::from_config(config)?;
        Ok(self.with_advisor(Arc::new(advisor)))
    }

    #[cfg(not(feature = "advisor"))]
    fn attach_configured_advisor(self, _config: &AdvisorConfig) -> Result<Self> {
        Err(crate::error::AduanaError::Config(
            "advisor.enabled is set but advisory support was not compiled in".to_string(),
        ))
    }

    /// Attach an advisory service.
    pub fn with_advisor(mut self, advisor: Arc<dyn Advisor>) -> Self {
        self.port = AdvisoryPort::new(advisor);
        self
    }

    /// Override the policy for one record shape.
    pub fn with_policy(mut self, shape: RecordShape, policy: RulePolicy) -> Self {
        match shape {
            RecordShape::Flexible => self.rules.flexible = policy,
            RecordShape::Fixed => self.rules.fixed = policy,
        }
        self
    }

    /// Set the batch concurrency limit (at least 1).
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn advisory_enabled(&self) -> bool {
        self.port.is_enabled()
    }

    /// Evaluate a record against today's date.
    pub fn evaluate(&self, record: &InvoiceRecord) -> ValidationOutcome {
        self.evaluate_at(record, Local::now().date_naive())
    }

    /// Evaluate a record against a fixed evaluation date.
    pub fn evaluate_at(&self, record: &InvoiceRecord, today: NaiveDate) -> ValidationOutcome {
        let ctx = RuleContext {
            record,
            policy: self.rules.for_shape(record.shape()),
            today,
            advisory: &self.port,
        };

        let mut out = ResultAggregator::new();
        for rule in CATALOG.iter() {
            let before = (out.error_count(), out.warning_count());
            rule.check(&ctx, &mut out);
            debug!(
                rule = rule.name(),
                errors = out.error_count() - before.0,
                warnings = out.warning_count() - before.1,
                "rule evaluated"
            );
        }

        if self.port.is_enabled() {
            self.merge_coherence(&ctx, &mut out);
        }

        let outcome = out.finish();
        debug!(
            number = record.invoice_number(),
            compliant = outcome.compliant,
            errors = outcome.errors.len(),
            warnings = outcome.warnings.len(),
            "invoice evaluated"
        );
        outcome
    }

    fn merge_coherence(&self, ctx: &RuleContext<'_>, out: &mut ResultAggregator) {
        let assessment = self
            .port
            .review_coherence(&CoherenceProjection::from_record(ctx.record));

        if assessment.degraded {
            if ctx.policy.report_advisory_failures {
                for note in &assessment.advisories {
                    out.record_warning(Finding::warning(COHERENCE_FIELD, note.clone()));
                }
            }
            return;
        }

        for problem in &assessment.problems {
            out.record_warning(Finding::warning(
                COHERENCE_FIELD,
                format!("Coherence problem: {problem}"),
            ));
        }
        for advisory in &assessment.advisories {
            out.record_warning(Finding::warning(COHERENCE_FIELD, advisory.clone()));
        }

        out.set_advisory(AdvisorySummary {
            coherent: assessment.verdict.as_flag(),
            problems: assessment.problems,
            advisories: assessment.advisories,
        });
    }

    /// Evaluate already-ingested records, preserving order.
    pub fn evaluate_many(
        &self,
        records: Vec<std::result::Result<InvoiceRecord, IngestError>>,
    ) -> Vec<ValidationOutcome> {
        self.evaluate_many_at(records, Local::now().date_naive())
    }

    /// [`Validator::evaluate_many`] against a fixed evaluation date.
    pub fn evaluate_many_at(
        &self,
        records: Vec<std::result::Result<InvoiceRecord, IngestError>>,
        today: NaiveDate,
    ) -> Vec<ValidationOutcome> {
        let evaluate_one = |input: &std::result::Result<InvoiceRecord, IngestError>| match input {
            Ok(record) => self.evaluate_at(record, today),
            Err(e) => ValidationOutcome::structural_failure(format!(
                "Invalid invoice structure: {e}"
            )),
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            if self.jobs > 1 && records.len() > 1 {
                match rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build() {
                    Ok(pool) => {
                        return pool.install(|| records.par_iter().map(evaluate_one).collect());
                    }
                    Err(e) => warn!("falling back to sequential evaluation: {}", e),
                }
            }
        }

        records.iter().map(evaluate_one).collect()
    }

    /// Ingest and evaluate one JSON invoice.
    pub fn evaluate_json(&self, document: &Value) -> ValidationOutcome {
        match ingest(document) {
            Ok(record) => self.evaluate(&record),
            Err(e) => {
                warn!("invoice rejected at ingestion: {}", e);
                ValidationOutcome::structural_failure(format!("Invalid invoice structure: {e}"))
            }
        }
    }

    /// Ingest and evaluate a batch document (an array, or a single invoice).
    pub fn evaluate_batch_json(&self, document: &Value) -> BatchReport {
        self.evaluate_batch_json_at(document, Local::now().date_naive())
    }

    /// [`Validator::evaluate_batch_json`] against a fixed evaluation date.
    pub fn evaluate_batch_json_at(&self, document: &Value, today: NaiveDate) -> BatchReport {
        let records = ingest_batch(document);
        let numbers: Vec<String> = match document {
            Value::Array(items) => items.iter().map(raw_invoice_number).collect(),
            single => vec![raw_invoice_number(single)],
        };

        let outcomes = self.evaluate_many_at(records, today);
        let invoices: Vec<BatchEntry> = outcomes
            .into_iter()
            .zip(numbers)
            .enumerate()
            .map(|(index, (outcome, invoice_number))| BatchEntry {
                index,
                invoice_number,
                outcome,
            })
            .collect();

        let report = BatchReport::new(invoices);
        info!(
            total = report.summary.total,
            approved = report.summary.approved,
            rejected = report.summary.rejected,
            "batch evaluated"
        );
        report
    }

    /// Remediation text for a field, from the advisor or a generic fallback.
    pub fn suggest_correction(&self, field: &str, value: &str, context: &str) -> String {
        self.port.remediation(field, value, context)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Invoice number straight from the raw document, for reporting.
///
/// Read without ingestion so records that fail ingestion still get one.
fn raw_invoice_number(document: &Value) -> String {
    let from_fixed = document.get("numero_factura");
    let from_fields = || {
        document
            .get("Fields")?
            .as_array()?
            .iter()
            .find(|entry| entry.get("Fields").and_then(Value::as_str) == Some("InvoiceNumber"))?
            .get("Value")
    };

    let number = match from_fixed.or_else(from_fields) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    if number.is_empty() {
        UNKNOWN_NUMBER.to_string()
    } else {
        number
    }
}
