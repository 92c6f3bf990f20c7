//! Optional semantic advisory service.
//!
//! An [`Advisor`] is an external, fallible judge of things the deterministic
//! rules cannot decide: whether a description is specific enough, and whether
//! the invoice hangs together as a whole. The engine never talks to an
//! advisor directly; it goes through [`AdvisoryPort`], which turns every
//! failure into an [`Verdict::Unknown`] result.

#[cfg(feature = "advisor")]
mod gemini;
pub mod reply;

#[cfg(feature = "advisor")]
pub use gemini::GeminiAdvisor;

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AdvisoryError;
use crate::models::record::InvoiceRecord;

/// Fallback remediation text when the advisor cannot produce one.
pub const GENERIC_REMEDIATION: &str =
    "Review this field and complete it according to DIAN import invoice requirements";

/// Tri-state advisory judgment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    Invalid,
    #[default]
    Unknown,
}

impl Verdict {
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Verdict::Valid,
            Some(false) => Verdict::Invalid,
            None => Verdict::Unknown,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Verdict::Valid => Some(true),
            Verdict::Invalid => Some(false),
            Verdict::Unknown => None,
        }
    }
}

/// A line item submitted for description review.
#[derive(Debug, Clone, Copy)]
pub struct DescriptionQuery<'a> {
    pub description: &'a str,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// Advisor judgment on one description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionAssessment {
    pub verdict: Verdict,
    /// Why the description is or is not adequate.
    pub reason: String,
    /// How to improve it; empty when adequate.
    pub suggestion: String,
    /// Set when the call failed and the verdict was forced to unknown.
    pub degraded: bool,
}

/// Simplified view of the invoice sent for coherence review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoherenceProjection {
    pub supplier: String,
    pub customer: String,
    pub country_of_origin: String,
    pub currency: String,
    pub incoterm: String,
    pub port_of_loading: String,
    pub port_of_discharge: String,
    pub total_value: String,
}

impl CoherenceProjection {
    pub fn from_record(record: &InvoiceRecord) -> Self {
        Self {
            supplier: record.seller_name().to_string(),
            customer: record.buyer_name().to_string(),
            country_of_origin: record.country_of_origin().to_string(),
            currency: record.currency().to_string(),
            incoterm: record.incoterm().to_string(),
            port_of_loading: record.port_of_loading().to_string(),
            port_of_discharge: record.port_of_discharge().to_string(),
            total_value: record
                .text(crate::models::record::fields::TOTAL_INVOICE_VALUE)
                .to_string(),
        }
    }
}

/// Advisor judgment on overall coherence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoherenceAssessment {
    pub verdict: Verdict,
    /// Serious inconsistencies.
    pub problems: Vec<String>,
    /// Minor remarks.
    pub advisories: Vec<String>,
    /// Set when the call failed and the verdict was forced to unknown.
    pub degraded: bool,
}

/// An external semantic-judgment capability.
///
/// Implementations may block on network I/O and may fail in any way; callers
/// go through [`AdvisoryPort`] which never lets a failure escape.
pub trait Advisor: Send + Sync {
    /// Whether this advisor does anything at all.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Judge whether a description meets regulatory specificity.
    fn assess_description(
        &self,
        query: &DescriptionQuery<'_>,
    ) -> Result<DescriptionAssessment, AdvisoryError>;

    /// Judge cross-field coherence of the invoice.
    fn assess_coherence(
        &self,
        projection: &CoherenceProjection,
    ) -> Result<CoherenceAssessment, AdvisoryError>;

    /// Produce remediation text for a field.
    fn suggest_correction(
        &self,
        field: &str,
        value: &str,
        context: &str,
    ) -> Result<String, AdvisoryError>;
}

/// Advisor used when no advisory service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAdvisor;

impl Advisor for NullAdvisor {
    fn is_enabled(&self) -> bool {
        false
    }

    fn assess_description(
        &self,
        _query: &DescriptionQuery<'_>,
    ) -> Result<DescriptionAssessment, AdvisoryError> {
        Err(AdvisoryError::Disabled)
    }

    fn assess_coherence(
        &self,
        _projection: &CoherenceProjection,
    ) -> Result<CoherenceAssessment, AdvisoryError> {
        Err(AdvisoryError::Disabled)
    }

    fn suggest_correction(
        &self,
        _field: &str,
        _value: &str,
        _context: &str,
    ) -> Result<String, AdvisoryError> {
        Err(AdvisoryError::Disabled)
    }
}

/// Fail-soft gateway between the engine and an [`Advisor`].
#[derive(Clone)]
pub struct AdvisoryPort {
    advisor: Arc<dyn Advisor>,
}

impl AdvisoryPort {
    pub fn new(advisor: Arc<dyn Advisor>) -> Self {
        Self { advisor }
    }

    /// Deterministic-rules-only mode.
    pub fn disabled() -> Self {
        Self::new(Arc::new(NullAdvisor))
    }

    pub fn is_enabled(&self) -> bool {
        self.advisor.is_enabled()
    }

    /// Description review; failures come back as a degraded unknown verdict.
    pub fn review_description(&self, query: &DescriptionQuery<'_>) -> DescriptionAssessment {
        match self.advisor.assess_description(query) {
            Ok(assessment) => {
                debug!(verdict = ?assessment.verdict, "description reviewed");
                assessment
            }
            Err(e) => {
                warn!("advisory description review failed: {}", e);
                DescriptionAssessment {
                    verdict: Verdict::Unknown,
                    reason: format!("advisory analysis failed: {e}"),
                    suggestion: String::new(),
                    degraded: true,
                }
            }
        }
    }

    /// Coherence review; failures come back as a degraded unknown verdict.
    pub fn review_coherence(&self, projection: &CoherenceProjection) -> CoherenceAssessment {
        match self.advisor.assess_coherence(projection) {
            Ok(assessment) => {
                debug!(
                    verdict = ?assessment.verdict,
                    problems = assessment.problems.len(),
                    "coherence reviewed"
                );
                assessment
            }
            Err(e) => {
                warn!("advisory coherence review failed: {}", e);
                CoherenceAssessment {
                    verdict: Verdict::Unknown,
                    problems: Vec::new(),
                    advisories: vec![format!("advisory analysis failed: {e}")],
                    degraded: true,
                }
            }
        }
    }

    /// Remediation text; falls back to [`GENERIC_REMEDIATION`].
    pub fn remediation(&self, field: &str, value: &str, context: &str) -> String {
        match self.advisor.suggest_correction(field, value, context) {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => GENERIC_REMEDIATION.to_string(),
            Err(e) => {
                warn!("advisory remediation failed: {}", e);
                GENERIC_REMEDIATION.to_string()
            }
        }
    }
}

impl Default for AdvisoryPort {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for AdvisoryPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryPort")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
