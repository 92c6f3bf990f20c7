//! Document type: definitive, original commercial invoices only.

use super::patterns::PRO_FORMA;
use super::{Rule, RuleContext};
use crate::aggregator::ResultAggregator;
use crate::models::outcome::{Finding, FindingCode};
use crate::models::record::fields;

/// Rejects pro-forma documents and flags copies.
pub struct DocumentTypeRule;

impl Rule for DocumentTypeRule {
    fn name(&self) -> &'static str {
        "document-type"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut ResultAggregator) {
        let document_type = ctx.record.document_type();

        if PRO_FORMA.is_match(document_type) {
            out.record_error(
                Finding::error(
                    fields::INVOICE_TYPE,
                    FindingCode::ProForma,
                    format!("Pro-forma invoices are not accepted. Current type: '{document_type}'"),
                )
                .with_suggestion("Ask the supplier for a definitive commercial invoice"),
            );
        }

        if ctx.record.is_original() == Some(false) {
            out.record_warning(
                Finding::warning(
                    fields::IS_ORIGINAL,
                    "The document is marked as a copy; customs expects the original invoice",
                )
                .with_suggestion("Submit the original commercial invoice issued by the seller"),
            );
        }
    }
}
