//! Seller and buyer completeness.

use super::{visible_len, Rule, RuleContext};
use crate::aggregator::ResultAggregator;
use crate::models::outcome::{Finding, FindingCode};
use crate::models::record::fields;

/// Minimum visible characters of a party name.
const MIN_NAME_LEN: usize = 3;

/// Seller name/address are blocking; buyer address and tax id are recommended.
pub struct PartyRule;

impl Rule for PartyRule {
    fn name(&self) -> &'static str {
        "parties"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut ResultAggregator) {
        let record = ctx.record;
        let policy = ctx.policy;

        if visible_len(record.seller_name()) < MIN_NAME_LEN {
            out.record_error(
                Finding::error(
                    fields::SUPPLIER,
                    FindingCode::SellerName,
                    "The seller's name is mandatory and must be complete",
                )
                .with_suggestion("Provide the supplier's full legal name"),
            );
        }

        if record.seller_address().chars().count() < policy.seller_address_min_len {
            out.record_error(
                Finding::error(
                    fields::SUPPLIER_ADDRESS,
                    FindingCode::SellerAddress,
                    "The seller's address must be complete",
                )
                .with_suggestion("Include the full address: street, number, city, country"),
            );
        }

        if visible_len(record.buyer_name()) < MIN_NAME_LEN {
            out.record_error(Finding::error(
                fields::CUSTOMER,
                FindingCode::BuyerName,
                "The buyer's name is mandatory",
            ));
        }

        if record.buyer_address().chars().count() < policy.buyer_address_min_len {
            out.record_warning(Finding::warning(
                fields::CUSTOMER_ADDRESS,
                "The buyer's address should be more complete",
            ));
        }

        if policy.shipment_details && record.buyer_tax_id().is_empty() {
            out.record_warning(Finding::warning(
                fields::CUSTOMER_TAX_ID,
                "Including the Colombian buyer's tax id (NIT) is recommended",
            ));
        }
    }
}
