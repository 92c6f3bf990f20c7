//! Configuration structures for the validation engine.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AduanaError, Result};
use crate::models::record::RecordShape;

/// Main configuration for aduana.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AduanaConfig {
    /// Rule policies per record shape.
    pub rules: RulesConfig,

    /// Advisory service configuration.
    pub advisor: AdvisorConfig,

    /// Batch evaluation configuration.
    pub batch: BatchConfig,
}

/// Rule policy for each record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Policy for `Fields`/`Table` records.
    pub flexible: RulePolicy,

    /// Policy for fixed-schema records.
    pub fixed: RulePolicy,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            flexible: RulePolicy::flexible(),
            fixed: RulePolicy::fixed(),
        }
    }
}

impl RulesConfig {
    /// Policy that applies to a record of the given shape.
    pub fn for_shape(&self, shape: RecordShape) -> &RulePolicy {
        match shape {
            RecordShape::Flexible => &self.flexible,
            RecordShape::Fixed => &self.fixed,
        }
    }
}

/// Absolute tolerance `max(percent × base, floor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Fraction of the base value (0.01 = 1%).
    pub percent: Decimal,
    /// Minimum allowance in currency units.
    pub floor: Decimal,
}

impl Tolerance {
    pub fn new(percent: Decimal, floor: Decimal) -> Self {
        Self { percent, floor }
    }

    /// Allowed discrepancy against `base`.
    pub fn allowance(&self, base: Decimal) -> Decimal {
        let relative = base.abs().checked_mul(self.percent).unwrap_or(Decimal::MAX);
        relative.max(self.floor)
    }

    /// Whether `declared` is further from `expected` than allowed.
    pub fn exceeded(&self, expected: Decimal, declared: Decimal) -> bool {
        match expected.checked_sub(declared) {
            Some(diff) => diff.abs() > self.allowance(expected),
            None => true,
        }
    }
}

/// How the item sum is compared to the declared grand total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TotalCheck {
    /// Mismatch beyond tolerance is a warning.
    Tolerant(Tolerance),
    /// Any mismatch at cent precision is an error.
    Strict,
}

/// Thresholds and severities of the rule catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulePolicy {
    /// Minimum seller address length.
    pub seller_address_min_len: usize,

    /// Buyer addresses shorter than this get a warning.
    pub buyer_address_min_len: usize,

    /// Per-item `quantity × unit price` vs line total.
    pub line_tolerance: Tolerance,

    /// Item sum vs declared grand total.
    pub total_check: TotalCheck,

    /// Invoices older than this many days get a warning.
    pub stale_after_days: i64,

    /// Warn when the issue place is blank.
    pub require_issue_place: bool,

    /// Warn when ports, country of origin or buyer tax id are blank.
    /// The fixed layout carries none of them.
    pub shipment_details: bool,

    /// Surface failed advisory calls as warnings.
    pub report_advisory_failures: bool,
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self::flexible()
    }
}

impl RulePolicy {
    /// Percentage-tolerance policy for `Fields`/`Table` records.
    pub fn flexible() -> Self {
        Self {
            seller_address_min_len: 10,
            buyer_address_min_len: 5,
            line_tolerance: Tolerance::new(Decimal::new(1, 2), Decimal::ONE),
            total_check: TotalCheck::Tolerant(Tolerance::new(Decimal::new(1, 2), Decimal::TWO)),
            stale_after_days: 365,
            require_issue_place: false,
            shipment_details: true,
            report_advisory_failures: false,
        }
    }

    /// Zero-tolerance policy for fixed-schema records.
    pub fn fixed() -> Self {
        Self {
            seller_address_min_len: 5,
            buyer_address_min_len: 5,
            line_tolerance: Tolerance::new(Decimal::ZERO, Decimal::new(1, 2)),
            total_check: TotalCheck::Strict,
            stale_after_days: 365,
            require_issue_place: true,
            shipment_details: false,
            report_advisory_failures: false,
        }
    }
}

/// Advisory (LLM) service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Consult the advisory service during evaluation.
    pub enabled: bool,

    /// Base URL of the generative language API.
    pub endpoint: String,

    /// Model name.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Per-call deadline in seconds.
    pub timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Batch evaluation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum records evaluated concurrently.
    pub jobs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { jobs: 4 }
    }
}

impl AduanaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the engine cannot work with.
    pub fn check(&self) -> Result<()> {
        if self.batch.jobs == 0 {
            return Err(AduanaError::Config("batch.jobs must be at least 1".to_string()));
        }
        for (name, policy) in [("flexible", &self.rules.flexible), ("fixed", &self.rules.fixed)] {
            let negative = |t: &Tolerance| t.percent.is_sign_negative() || t.floor.is_sign_negative();
            let total_negative = match &policy.total_check {
                TotalCheck::Tolerant(t) => negative(t),
                TotalCheck::Strict => false,
            };
            if negative(&policy.line_tolerance) || total_negative {
                return Err(AduanaError::Config(format!(
                    "rules.{name}: tolerances must not be negative"
                )));
            }
        }
        Ok(())
    }
}
