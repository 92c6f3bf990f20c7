//! Line-item description specificity.
//!
//! The minimum-length rule is deterministic and blocking. Descriptions that
//! pass it may additionally be reviewed by the advisory service, whose
//! opinion is only ever a warning.

use super::{item_path, Rule, RuleContext};
use crate::advisory::{DescriptionQuery, Verdict};
use crate::aggregator::ResultAggregator;
use crate::models::outcome::{Finding, FindingCode};

/// Descriptions shorter than this are too generic.
pub const MIN_DESCRIPTION_LEN: usize = 10;

pub struct DescriptionRule;

impl Rule for DescriptionRule {
    fn name(&self) -> &'static str {
        "descriptions"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut ResultAggregator) {
        let review = ctx.advisory.is_enabled();

        for (idx, item) in ctx.record.items().iter().enumerate() {
            let description = item.description();
            let path = item_path(idx, "Description");

            if description.chars().count() < MIN_DESCRIPTION_LEN {
                out.record_error(
                    Finding::error(
                        &path,
                        FindingCode::GenericDescription,
                        format!("Description too short: '{description}'"),
                    )
                    .with_suggestion(format!(
                        "Item {}: include brand, model and technical characteristics",
                        idx + 1
                    )),
                );
                continue;
            }

            if !review {
                continue;
            }

            let assessment = ctx.advisory.review_description(&DescriptionQuery {
                description,
                quantity: item.quantity().or_zero(),
                unit_price: item.unit_price().or_zero(),
            });

            match assessment.verdict {
                Verdict::Invalid => {
                    let reason = if assessment.reason.is_empty() {
                        "insufficient description"
                    } else {
                        assessment.reason.as_str()
                    };
                    let mut finding = Finding::warning(&path, format!("Advisory review: {reason}"));
                    if !assessment.suggestion.is_empty() {
                        finding = finding
                            .with_suggestion(format!("Item {}: {}", idx + 1, assessment.suggestion));
                    }
                    out.record_warning(finding);
                }
                Verdict::Unknown if assessment.degraded && ctx.policy.report_advisory_failures => {
                    out.record_warning(Finding::warning(
                        &path,
                        format!(
                            "Advisory review of item {} could not be completed: {}",
                            idx + 1,
                            assessment.reason
                        ),
                    ));
                }
                Verdict::Valid | Verdict::Unknown => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::advisory::testing::{FailingAdvisor, StrictAdvisor};
    use crate::advisory::AdvisoryPort;
    use crate::models::config::RulePolicy;
    use crate::models::record::{InvoiceRecord, LineItem};
    use crate::rules::testing::{run, run_with, valid_record};
    use pretty_assertions::assert_eq;

    fn with_descriptions(descriptions: &[&str]) -> InvoiceRecord {
        descriptions.iter().fold(InvoiceRecord::default(), |record, d| {
            record.with_item(LineItem::new(*d, "1", "10", "10"))
        })
    }

    #[test]
    fn test_short_descriptions_are_errors() {
        let record = with_descriptions(&["Parts", "Stainless steel hex bolts M8", "  misc    "]);
        let outcome = run(&DescriptionRule, &record);
        assert!(!outcome.compliant);
        let paths: Vec<&str> = outcome.errors.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(paths, vec!["Table[0].Description", "Table[2].Description"]);
        assert_eq!(outcome.suggestions.len(), 2);
        assert!(outcome.suggestions[1].starts_with("Item 3:"));
    }

    #[test]
    fn test_advisor_rejection_is_only_a_warning() {
        let port = AdvisoryPort::new(Arc::new(StrictAdvisor));
        let outcome = run_with(&DescriptionRule, &valid_record(), &RulePolicy::flexible(), &port);
        assert!(outcome.compliant);
        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome.warnings[0].message.starts_with("Advisory review:"));
        assert_eq!(outcome.suggestions[0], "Item 1: State brand, model and material");
    }

    #[test]
    fn test_advisor_never_sees_short_descriptions() {
        let port = AdvisoryPort::new(Arc::new(StrictAdvisor));
        let record = with_descriptions(&["Parts"]);
        let outcome = run_with(&DescriptionRule, &record, &RulePolicy::flexible(), &port);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_advisor_failure_is_silent_by_default() {
        let port = AdvisoryPort::new(Arc::new(FailingAdvisor));
        let outcome = run_with(&DescriptionRule, &valid_record(), &RulePolicy::flexible(), &port);
        assert!(outcome.compliant);
        assert!(outcome.warnings.is_empty());

        let reporting = RulePolicy {
            report_advisory_failures: true,
            ..RulePolicy::flexible()
        };
        let outcome = run_with(&DescriptionRule, &valid_record(), &reporting, &port);
        assert!(outcome.compliant);
        assert_eq!(outcome.warnings.len(), 2);
    }
}
