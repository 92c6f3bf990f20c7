//! Per-evaluation accumulation of findings.

use crate::models::outcome::{AdvisorySummary, Finding, Severity, ValidationOutcome};

/// Collects findings for exactly one evaluation.
///
/// The compliant flag starts `true` and turns `false` permanently on the
/// first error. Nothing recorded can be removed.
#[derive(Debug)]
pub struct ResultAggregator {
    compliant: bool,
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
    suggestions: Vec<String>,
    advisory: Option<AdvisorySummary>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {
            compliant: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
            advisory: None,
        }
    }

    /// Record a blocking finding. Its suggestion, if any, joins the suggestion list.
    pub fn record_error(&mut self, mut finding: Finding) {
        finding.severity = Severity::Error;
        self.compliant = false;
        if let Some(suggestion) = &finding.suggestion {
            self.suggestions.push(suggestion.clone());
        }
        self.errors.push(finding);
    }

    /// Record a non-blocking finding. Its suggestion, if any, joins the suggestion list.
    pub fn record_warning(&mut self, mut finding: Finding) {
        finding.severity = Severity::Warning;
        if let Some(suggestion) = &finding.suggestion {
            self.suggestions.push(suggestion.clone());
        }
        self.warnings.push(finding);
    }

    pub fn record_suggestion(&mut self, text: impl Into<String>) {
        self.suggestions.push(text.into());
    }

    /// Attach the advisory coherence summary. Only the first one is kept.
    pub fn set_advisory(&mut self, summary: AdvisorySummary) {
        if self.advisory.is_none() {
            self.advisory = Some(summary);
        }
    }

    pub fn is_compliant(&self) -> bool {
        self.compliant
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Close the evaluation.
    pub fn finish(self) -> ValidationOutcome {
        ValidationOutcome {
            compliant: self.compliant,
            errors: self.errors,
            warnings: self.warnings,
            suggestions: self.suggestions,
            advisory: self.advisory,
        }
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}
