//! Monetary coherence between quantities, prices and totals.

use rust_decimal::Decimal;

use super::{item_path, Rule, RuleContext};
use crate::aggregator::ResultAggregator;
use crate::models::config::TotalCheck;
use crate::models::outcome::{Finding, FindingCode};
use crate::models::record::{fields, LineItem, Numeric};

/// Per-item arithmetic and item sum vs declared grand total.
pub struct MonetaryCoherenceRule;

impl Rule for MonetaryCoherenceRule {
    fn name(&self) -> &'static str {
        "monetary-coherence"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut ResultAggregator) {
        for (idx, item) in ctx.record.items().iter().enumerate() {
            check_line(ctx, idx, item, out);
        }
        check_grand_total(ctx, out);
    }
}

fn check_line(ctx: &RuleContext<'_>, idx: usize, item: &LineItem, out: &mut ResultAggregator) {
    let quantity = item.quantity();
    let unit_price = item.unit_price();
    let declared = item.line_total();

    if quantity.is_unparseable() || unit_price.is_unparseable() || declared.is_unparseable() {
        out.record_warning(Finding::warning(
            format!("Table[{idx}]"),
            format!("Could not validate the numeric values of item {}", idx + 1),
        ));
        return;
    }

    let (quantity, unit_price, declared) =
        (quantity.or_zero(), unit_price.or_zero(), declared.or_zero());
    if quantity <= Decimal::ZERO || unit_price <= Decimal::ZERO {
        return;
    }

    let Some(product) = quantity.checked_mul(unit_price) else {
        out.record_warning(Finding::warning(
            format!("Table[{idx}]"),
            format!("Item {}: quantity × unit price is out of range", idx + 1),
        ));
        return;
    };

    let expected = product.round_dp(2);
    if ctx.policy.line_tolerance.exceeded(expected, declared) {
        out.record_warning(Finding::warning(
            item_path(idx, "NetValuePerItem"),
            format!(
                "Item {}: possible calculation error. Calculated {:.2}, declared {:.2}",
                idx + 1,
                expected,
                declared
            ),
        ));
    }
}

fn check_grand_total(ctx: &RuleContext<'_>, out: &mut ResultAggregator) {
    let declared = match ctx.record.declared_total() {
        Numeric::Unparseable(raw) => {
            out.record_warning(Finding::warning(
                fields::TOTAL_INVOICE_VALUE,
                format!("The declared total '{raw}' is not a number"),
            ));
            return;
        }
        Numeric::Absent => return,
        Numeric::Value(value) => value,
    };
    if declared <= Decimal::ZERO {
        return;
    }

    let sum = ctx
        .record
        .items()
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total().or_zero()));
    let Some(sum) = sum else {
        out.record_warning(Finding::warning(
            fields::TOTAL_INVOICE_VALUE,
            "The sum of item totals is out of range",
        ));
        return;
    };

    let message = format!(
        "Sum of items ({:.2}) differs from the declared total ({:.2})",
        sum, declared
    );
    match ctx.policy.total_check {
        TotalCheck::Tolerant(tolerance) => {
            if tolerance.exceeded(declared, sum) {
                out.record_warning(Finding::warning(fields::TOTAL_INVOICE_VALUE, message));
            }
        }
        TotalCheck::Strict => {
            if sum.round_dp(2) != declared.round_dp(2) {
                out.record_error(
                    Finding::error(fields::TOTAL_INVOICE_VALUE, FindingCode::TotalMismatch, message)
                        .with_suggestion("Make the net invoice value equal the sum of the item totals"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::AdvisoryPort;
    use crate::models::config::{RulePolicy, Tolerance};
    use crate::models::record::{InvoiceRecord, RecordShape};
    use crate::rules::testing::{run, run_with};
    use pretty_assertions::assert_eq;

    fn one_item(quantity: &str, price: &str, total: &str) -> InvoiceRecord {
        InvoiceRecord::new(RecordShape::Flexible).with_item(LineItem::new(
            "Ceramic floor tiles 60x60 cm, matte grey",
            quantity,
            price,
            total,
        ))
    }

    fn percent_only() -> RulePolicy {
        RulePolicy {
            line_tolerance: Tolerance::new(Decimal::new(1, 2), Decimal::ZERO),
            ..RulePolicy::flexible()
        }
    }

    #[test]
    fn test_one_percent_boundary() {
        let port = AdvisoryPort::disabled();
        let policy = percent_only();

        let outcome = run_with(&MonetaryCoherenceRule, &one_item("3", "10.00", "30.30"), &policy, &port);
        assert!(outcome.warnings.is_empty());

        let outcome = run_with(&MonetaryCoherenceRule, &one_item("3", "10.00", "30.40"), &policy, &port);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].field, "Table[0].NetValuePerItem");
    }

    #[test]
    fn test_default_floor_of_one_unit() {
        let outcome = run(&MonetaryCoherenceRule, &one_item("3", "10.00", "30.40"));
        assert!(outcome.warnings.is_empty());

        let outcome = run(&MonetaryCoherenceRule, &one_item("3", "10.00", "31.01"));
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].message.contains("Calculated 30.00, declared 31.01"));
    }

    #[test]
    fn test_line_mismatch_is_never_an_error() {
        let outcome = run(&MonetaryCoherenceRule, &one_item("10", "100", "5"));
        assert!(outcome.compliant);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_zero_quantity_is_skipped() {
        let outcome = run(&MonetaryCoherenceRule, &one_item("0", "10", "999"));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_garbled_numbers_warn_on_item() {
        let outcome = run(&MonetaryCoherenceRule, &one_item("ten", "10", "100"));
        assert!(outcome.compliant);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].field, "Table[0]");
    }

    #[test]
    fn test_overflow_degrades_to_warning() {
        let huge = "79228162514264337593543950335";
        let outcome = run(&MonetaryCoherenceRule, &one_item(huge, huge, "1"));
        assert!(outcome.compliant);
        assert_eq!(outcome.warnings[0].field, "Table[0]");
    }

    #[test]
    fn test_grand_total_single_warning_regardless_of_item_count() {
        for count in [1usize, 3, 12] {
            let record = (0..count).fold(
                InvoiceRecord::new(RecordShape::Flexible)
                    .with_field(fields::TOTAL_INVOICE_VALUE, "100000"),
                |record, _| {
                    record.with_item(LineItem::new("Hydraulic pump 2HP cast iron", "1", "10", "10"))
                },
            );
            let outcome = run(&MonetaryCoherenceRule, &record);
            let total_warnings = outcome.warnings_for(fields::TOTAL_INVOICE_VALUE).count();
            assert_eq!(total_warnings, 1, "{count} items");
            assert!(outcome.compliant);
        }
    }

    #[test]
    fn test_grand_total_within_two_units() {
        let record = one_item("1", "100", "100").with_field(fields::TOTAL_INVOICE_VALUE, "101.99");
        let outcome = run(&MonetaryCoherenceRule, &record);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_strict_total_for_fixed_records() {
        let record = InvoiceRecord::new(RecordShape::Fixed)
            .with_field(fields::TOTAL_INVOICE_VALUE, "1000.01")
            .with_item(LineItem::new("Industrial components", "100", "10.00", "1000.00"));
        let outcome = run(&MonetaryCoherenceRule, &record);
        assert!(!outcome.compliant);
        assert!(outcome.has_error(FindingCode::TotalMismatch));

        let record = InvoiceRecord::new(RecordShape::Fixed)
            .with_field(fields::TOTAL_INVOICE_VALUE, "1000.00")
            .with_item(LineItem::new("Industrial components", "100", "10.00", "1000.00"));
        assert!(run(&MonetaryCoherenceRule, &record).compliant);
    }

    #[test]
    fn test_unparseable_declared_total() {
        let record = one_item("1", "100", "100").with_field(fields::TOTAL_INVOICE_VALUE, "about 100");
        let outcome = run(&MonetaryCoherenceRule, &record);
        assert_eq!(outcome.warnings_for(fields::TOTAL_INVOICE_VALUE).count(), 1);
    }
}
