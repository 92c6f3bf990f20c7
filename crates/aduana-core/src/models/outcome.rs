//! Findings and the aggregate validation outcome.

use serde::{Deserialize, Serialize};

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocking: the invoice is not compliant.
    Error,
    /// Advisory: recommended fix, never blocks.
    Warning,
}

/// Machine-readable code attached to blocking findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingCode {
    /// Input could not be read as an invoice at all.
    #[serde(rename = "DIAN_000")]
    Structure,
    /// Pro-forma document.
    #[serde(rename = "DIAN_001")]
    ProForma,
    #[serde(rename = "DIAN_002")]
    MissingInvoiceNumber,
    #[serde(rename = "DIAN_003")]
    SellerName,
    #[serde(rename = "DIAN_004")]
    SellerAddress,
    #[serde(rename = "DIAN_005")]
    BuyerName,
    #[serde(rename = "DIAN_006")]
    MissingIssueDate,
    /// Issue date lies after the evaluation date.
    #[serde(rename = "DIAN_007")]
    FutureIssueDate,
    /// Line-item description too short to identify the goods.
    #[serde(rename = "DIAN_008")]
    GenericDescription,
    #[serde(rename = "DIAN_009")]
    MissingCurrency,
    #[serde(rename = "DIAN_010")]
    MissingIncoterm,
    /// CIF/CIP without declared insurance.
    #[serde(rename = "DIAN_011")]
    MissingInsurance,
    #[serde(rename = "DIAN_012")]
    DiscountWithoutReason,
    #[serde(rename = "DIAN_013")]
    DiscountExceedsNet,
    /// Item sum differs from the declared net value (strict policy).
    #[serde(rename = "DIAN_014")]
    TotalMismatch,
}

impl FindingCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCode::Structure => "DIAN_000",
            FindingCode::ProForma => "DIAN_001",
            FindingCode::MissingInvoiceNumber => "DIAN_002",
            FindingCode::SellerName => "DIAN_003",
            FindingCode::SellerAddress => "DIAN_004",
            FindingCode::BuyerName => "DIAN_005",
            FindingCode::MissingIssueDate => "DIAN_006",
            FindingCode::FutureIssueDate => "DIAN_007",
            FindingCode::GenericDescription => "DIAN_008",
            FindingCode::MissingCurrency => "DIAN_009",
            FindingCode::MissingIncoterm => "DIAN_010",
            FindingCode::MissingInsurance => "DIAN_011",
            FindingCode::DiscountWithoutReason => "DIAN_012",
            FindingCode::DiscountExceedsNet => "DIAN_013",
            FindingCode::TotalMismatch => "DIAN_014",
        }
    }
}

impl std::fmt::Display for FindingCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule outcome attached to a field path such as `Table[2].Description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Dotted/indexed path of the offending field.
    pub field: String,

    pub severity: Severity,

    /// Human-readable explanation.
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<FindingCode>,

    /// How to fix it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Finding {
    /// A blocking finding.
    pub fn error(field: impl Into<String>, code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            severity: Severity::Error,
            message: message.into(),
            code: Some(code),
            suggestion: None,
        }
    }

    /// A non-blocking finding.
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            severity: Severity::Warning,
            message: message.into(),
            code: None,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Result of the optional advisory coherence review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorySummary {
    /// `None` when the advisor could not decide or failed.
    pub coherent: Option<bool>,

    #[serde(default)]
    pub problems: Vec<String>,

    #[serde(default)]
    pub advisories: Vec<String>,
}

/// Aggregate result of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// False when any error-severity finding exists.
    pub compliant: bool,

    pub errors: Vec<Finding>,

    pub warnings: Vec<Finding>,

    pub suggestions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<AdvisorySummary>,
}

impl ValidationOutcome {
    /// Outcome for input that could not be read as an invoice.
    pub fn structural_failure(message: impl Into<String>) -> Self {
        Self {
            compliant: false,
            errors: vec![Finding::error("general", FindingCode::Structure, message)],
            warnings: Vec::new(),
            suggestions: Vec::new(),
            advisory: None,
        }
    }

    /// Whether an error with the given code was recorded.
    pub fn has_error(&self, code: FindingCode) -> bool {
        self.errors.iter().any(|f| f.code == Some(code))
    }

    /// Warnings recorded against a field path.
    pub fn warnings_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.warnings.iter().filter(move |f| f.field == field)
    }
}
