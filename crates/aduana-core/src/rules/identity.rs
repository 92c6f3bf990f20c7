//! Identity: invoice number, issue date, issue place.

use chrono::Duration;

use super::{Rule, RuleContext};
use crate::aggregator::ResultAggregator;
use crate::models::outcome::{Finding, FindingCode};
use crate::models::record::fields;

/// Invoice number and issue date presence, plus date range.
pub struct IdentityRule;

impl Rule for IdentityRule {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut ResultAggregator) {
        let record = ctx.record;

        if record.invoice_number().is_empty() {
            out.record_error(
                Finding::error(
                    fields::INVOICE_NUMBER,
                    FindingCode::MissingInvoiceNumber,
                    "The invoice number is mandatory",
                )
                .with_suggestion("Ask the supplier for the invoice number"),
            );
        }

        self.check_issue_date(ctx, out);

        if ctx.policy.require_issue_place && record.issue_place().is_empty() {
            out.record_warning(Finding::warning(
                fields::ISSUE_PLACE,
                "The place of issue should be stated on the invoice",
            ));
        }
    }
}

impl IdentityRule {
    fn check_issue_date(&self, ctx: &RuleContext<'_>, out: &mut ResultAggregator) {
        let raw = ctx.record.issue_date_text();
        if raw.is_empty() {
            out.record_error(Finding::error(
                fields::INVOICE_DATE,
                FindingCode::MissingIssueDate,
                "The issue date is mandatory",
            ));
            return;
        }

        let Some(issued) = ctx.record.issue_date() else {
            out.record_warning(Finding::warning(
                fields::INVOICE_DATE,
                format!("Unrecognized date format: '{raw}'"),
            ));
            return;
        };

        if issued > ctx.today {
            out.record_error(
                Finding::error(
                    fields::INVOICE_DATE,
                    FindingCode::FutureIssueDate,
                    format!("The issue date ({issued}) cannot be in the future"),
                )
                .with_suggestion("Confirm the issue date with the supplier"),
            );
        }

        let stale_before = Duration::try_days(ctx.policy.stale_after_days)
            .and_then(|age| ctx.today.checked_sub_signed(age));
        if stale_before.is_some_and(|limit| issued < limit) {
            out.record_warning(Finding::warning(
                fields::INVOICE_DATE,
                format!(
                    "The invoice is more than {} days old ({issued})",
                    ctx.policy.stale_after_days
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{InvoiceRecord, RecordShape};
    use crate::rules::testing::{run, today};
    use pretty_assertions::assert_eq;

    fn dated(date: &str) -> InvoiceRecord {
        InvoiceRecord::new(RecordShape::Flexible)
            .with_field(fields::INVOICE_NUMBER, "INV-1")
            .with_field(fields::INVOICE_DATE, date)
    }

    #[test]
    fn test_missing_number_and_date() {
        let outcome = run(&IdentityRule, &InvoiceRecord::default());
        assert!(outcome.has_error(FindingCode::MissingInvoiceNumber));
        assert!(outcome.has_error(FindingCode::MissingIssueDate));
        assert_eq!(outcome.errors.len(), 2);
    }

    #[test]
    fn test_tomorrow_is_future() {
        let tomorrow = (today() + Duration::days(1)).format("%Y-%m-%d").to_string();
        let outcome = run(&IdentityRule, &dated(&tomorrow));
        assert!(!outcome.compliant);
        assert!(outcome.has_error(FindingCode::FutureIssueDate));
    }

    #[test]
    fn test_today_is_fine() {
        let outcome = run(&IdentityRule, &dated("2025-11-20"));
        assert!(outcome.compliant);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_old_invoice_warns() {
        let outcome = run(&IdentityRule, &dated("15-Mar-2024"));
        assert!(outcome.compliant);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].field, fields::INVOICE_DATE);
    }

    #[test]
    fn test_exactly_a_year_old_is_not_stale() {
        let outcome = run(&IdentityRule, &dated("2024-11-20"));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_unparseable_date_warns() {
        let outcome = run(&IdentityRule, &dated("the tenth of November"));
        assert!(outcome.compliant);
        assert!(outcome.warnings[0].message.contains("Unrecognized date format"));
    }

    #[test]
    fn test_issue_place_required_by_fixed_policy() {
        let record = InvoiceRecord::new(RecordShape::Fixed)
            .with_field(fields::INVOICE_NUMBER, "INV-1")
            .with_field(fields::INVOICE_DATE, "2025-11-01");
        let outcome = run(&IdentityRule, &record);
        assert!(outcome.compliant);
        assert_eq!(outcome.warnings[0].field, fields::ISSUE_PLACE);
    }
}
