//! Currency and Incoterm checks.

use rust_decimal::Decimal;

use super::patterns::{COMMON_CURRENCIES, FREIGHT_TERMS, INCOTERMS_2020, INSURANCE_TERMS};
use super::{Rule, RuleContext};
use crate::aggregator::ResultAggregator;
use crate::models::outcome::{Finding, FindingCode};
use crate::models::record::{fields, Numeric};

/// Currency presence and allow-list membership.
pub struct CurrencyRule;

impl Rule for CurrencyRule {
    fn name(&self) -> &'static str {
        "currency"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut ResultAggregator) {
        let currency = ctx.record.currency();

        if currency.is_empty() {
            out.record_error(
                Finding::error(
                    fields::CURRENCY,
                    FindingCode::MissingCurrency,
                    "The transaction currency is mandatory",
                )
                .with_suggestion("State the currency (USD, EUR, COP, etc.)"),
            );
        } else if !COMMON_CURRENCIES.contains(&currency.to_uppercase().as_str()) {
            out.record_warning(Finding::warning(
                fields::CURRENCY,
                format!("Currency '{currency}' is uncommon. Check the ISO 4217 code"),
            ));
        }
    }
}

/// Incoterm presence and membership in Incoterms 2020.
pub struct IncotermRule;

impl Rule for IncotermRule {
    fn name(&self) -> &'static str {
        "incoterm"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut ResultAggregator) {
        let incoterm = ctx.record.incoterm();

        if incoterm.is_empty() {
            out.record_error(
                Finding::error(
                    fields::INCOTERM,
                    FindingCode::MissingIncoterm,
                    "The Incoterm is mandatory for imports",
                )
                .with_suggestion("State the Incoterm (FOB, CIF, CIP, etc.)"),
            );
        } else if !INCOTERMS_2020.contains(&incoterm.to_uppercase().as_str()) {
            out.record_warning(Finding::warning(
                fields::INCOTERM,
                format!("Incoterm '{incoterm}' is not recognized or is outdated"),
            ));
        }
    }
}

/// Insurance and freight obligations implied by the Incoterm.
pub struct IncotermConditionsRule;

impl Rule for IncotermConditionsRule {
    fn name(&self) -> &'static str {
        "incoterm-conditions"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut ResultAggregator) {
        let incoterm = ctx.record.incoterm().to_uppercase();
        let term = incoterm.as_str();

        if INSURANCE_TERMS.contains(&term) {
            match ctx.record.insurance_cost() {
                Numeric::Unparseable(raw) => unreadable_cost(fields::INSURANCE_COST, "insurance", &raw, out),
                cost if cost.or_zero() <= Decimal::ZERO => out.record_error(
                    Finding::error(
                        fields::INSURANCE_COST,
                        FindingCode::MissingInsurance,
                        format!("Incoterm {term} requires the seller to insure the goods, but no insurance cost is declared"),
                    )
                    .with_suggestion("Declare the insurance cost paid by the seller"),
                ),
                _ => {}
            }
        }

        if FREIGHT_TERMS.contains(&term) {
            match ctx.record.freight_cost() {
                Numeric::Unparseable(raw) => unreadable_cost(fields::FREIGHT_COST, "freight", &raw, out),
                cost if cost.or_zero() <= Decimal::ZERO => out.record_warning(Finding::warning(
                    fields::FREIGHT_COST,
                    format!("Incoterm {term} usually includes main carriage, but no freight cost is declared"),
                )),
                _ => {}
            }
        }
    }
}

fn unreadable_cost(field: &str, kind: &str, raw: &str, out: &mut ResultAggregator) {
    out.record_warning(
        Finding::warning(field, format!("The declared {kind} cost '{raw}' is not a number"))
            .with_suggestion(format!("Declare the {kind} cost as a plain amount")),
    );
}
