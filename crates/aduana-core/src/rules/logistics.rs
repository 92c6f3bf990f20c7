//! Ports and origin: recommended, never blocking.

use super::{Rule, RuleContext};
use crate::aggregator::ResultAggregator;
use crate::models::outcome::Finding;
use crate::models::record::fields;

pub struct LogisticsRule;

impl Rule for LogisticsRule {
    fn name(&self) -> &'static str {
        "logistics"
    }

    fn check(&self, ctx: &RuleContext<'_>, out: &mut ResultAggregator) {
        if !ctx.policy.shipment_details {
            return;
        }

        let record = ctx.record;
        let checks = [
            (
                record.port_of_loading(),
                fields::PORT_OF_LOADING,
                "The port of loading should be specified",
            ),
            (
                record.port_of_discharge(),
                fields::PORT_OF_DISCHARGE,
                "The port of discharge in Colombia should be specified",
            ),
            (
                record.country_of_origin(),
                fields::COUNTRY_OF_ORIGIN,
                "Specifying the country of origin of the goods is recommended",
            ),
        ];

        for (value, field, message) in checks {
            if value.is_empty() {
                out.record_warning(Finding::warning(field, message));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{InvoiceRecord, RecordShape};
    use crate::rules::testing::run;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_missing() {
        let outcome = run(&LogisticsRule, &InvoiceRecord::default());
        assert!(outcome.compliant);
        let paths: Vec<&str> = outcome.warnings.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(
            paths,
            vec![fields::PORT_OF_LOADING, fields::PORT_OF_DISCHARGE, fields::COUNTRY_OF_ORIGIN]
        );
    }

    #[test]
    fn test_fixed_layout_skips_shipment_details() {
        let outcome = run(&LogisticsRule, &InvoiceRecord::new(RecordShape::Fixed));
        assert!(outcome.compliant);
        assert!(outcome.warnings.is_empty());
    }
}
