//! Discounts must be itemized with a reason and bounded by the net value.

use rust_decimal::Decimal;

use super::{Rule, RuleContext};
use crate::aggregator::ResultAggregator;
use crate::models::outcome::{Finding, FindingCode};
use crate::models::record::{fields, Numeric};

pub struct DiscountRule;

impl Rule for DiscountRule {
    fn name(&self) -> &'static str {
        "discount"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut ResultAggregator) {
        let discount = match ctx.record.discount() {
            Numeric::Value(value) => value,
            Numeric::Absent => return,
            Numeric::Unparseable(raw) => {
                out.record_warning(
                    Finding::warning(
                        fields::DISCOUNT,
                        format!("The declared discount '{raw}' is not a number"),
                    )
                    .with_suggestion("Declare the discount as an amount in the invoice currency"),
                );
                return;
            }
        };
        if discount <= Decimal::ZERO {
            return;
        }

        if ctx.record.discount_reason().is_empty() {
            out.record_error(
                Finding::error(
                    fields::DISCOUNT_REASON,
                    FindingCode::DiscountWithoutReason,
                    format!("A discount of {discount:.2} is declared without its reason"),
                )
                .with_suggestion("State the concept of the discount (volume, early payment, etc.)"),
            );
        }

        // Compared only when a net value was declared at all
        if let Numeric::Value(net) = ctx.record.declared_total() {
            if discount > net {
                out.record_error(Finding::error(
                    fields::DISCOUNT,
                    FindingCode::DiscountExceedsNet,
                    format!("The discount ({discount:.2}) exceeds the net invoice value ({net:.2})"),
                ));
            }
        }
    }
}
