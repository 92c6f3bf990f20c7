//! Core library for customs commercial-invoice compliance checks.
//!
//! This crate provides:
//! - Ingestion of flexible (`Fields`/`Table`) and fixed-schema invoice JSON
//! - Typed field accessors with soft-fail number and date parsing
//! - A fixed catalog of DIAN import-invoice rules
//! - An optional semantic advisory port (LLM-backed, fail-soft)
//! - Single and batch evaluation into structured compliance outcomes

pub mod advisory;
pub mod aggregator;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod models;
pub mod requirements;
pub mod rules;

pub use advisory::{Advisor, AdvisoryPort, NullAdvisor, Verdict};
#[cfg(feature = "advisor")]
pub use advisory::GeminiAdvisor;
pub use aggregator::ResultAggregator;
pub use engine::{BatchEntry, BatchReport, BatchSummary, Validator, COHERENCE_FIELD};
pub use error::{AduanaError, AdvisoryError, IngestError, Result};
pub use ingest::{ingest, ingest_batch};
pub use models::config::{AduanaConfig, RulePolicy, Tolerance, TotalCheck};
pub use models::outcome::{AdvisorySummary, Finding, FindingCode, Severity, ValidationOutcome};
pub use models::record::{InvoiceRecord, LineItem, Numeric, RecordShape};
pub use requirements::{requirements, Requirements};
