//! DIAN import-invoice rule catalog.
//!
//! Every rule reads the immutable record through [`RuleContext`] and writes
//! into the shared [`ResultAggregator`]. Rules run in the order of
//! [`CATALOG`]; the order shapes the finding lists, never the verdict.

pub mod amounts;
pub mod descriptions;
pub mod discount;
pub mod document;
pub mod extract;
pub mod identity;
pub mod logistics;
pub mod parties;
pub mod patterns;
pub mod trade;

pub use amounts::MonetaryCoherenceRule;
pub use descriptions::DescriptionRule;
pub use discount::DiscountRule;
pub use document::DocumentTypeRule;
pub use extract::{parse_amount, parse_date, parse_flag};
pub use identity::IdentityRule;
pub use logistics::LogisticsRule;
pub use parties::PartyRule;
pub use trade::{CurrencyRule, IncotermConditionsRule, IncotermRule};

use chrono::NaiveDate;

use crate::advisory::AdvisoryPort;
use crate::aggregator::ResultAggregator;
use crate::models::config::RulePolicy;
use crate::models::record::InvoiceRecord;

/// Everything a rule may look at.
pub struct RuleContext<'a> {
    pub record: &'a InvoiceRecord,
    pub policy: &'a RulePolicy,
    /// Evaluation date for temporal checks.
    pub today: NaiveDate,
    pub advisory: &'a AdvisoryPort,
}

/// A single compliance check.
pub trait Rule: Send + Sync {
    /// Short category name for logs.
    fn name(&self) -> &'static str;

    /// Evaluate the record, recording zero or more findings.
    fn check(&self, ctx: &RuleContext<'_>, out: &mut ResultAggregator);
}

/// All rules in evaluation order.
pub static CATALOG: [&dyn Rule; 10] = [
    &DocumentTypeRule,
    &IdentityRule,
    &PartyRule,
    &DescriptionRule,
    &MonetaryCoherenceRule,
    &CurrencyRule,
    &IncotermRule,
    &IncotermConditionsRule,
    &DiscountRule,
    &LogisticsRule,
];

/// Field path of a line-item column, e.g. `Table[2].Description`.
pub fn item_path(index: usize, column: &str) -> String {
    format!("Table[{index}].{column}")
}

/// Count of non-whitespace characters.
pub(crate) fn visible_len(s: &str) -> usize {
    s.chars().filter(|c| !c.is_whitespace()).count()
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by rule tests.

    use chrono::NaiveDate;

    use super::{Rule, RuleContext};
    use crate::advisory::AdvisoryPort;
    use crate::aggregator::ResultAggregator;
    use crate::models::config::RulePolicy;
    use crate::models::outcome::ValidationOutcome;
    use crate::models::record::{fields, InvoiceRecord, LineItem, RecordShape};

    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()
    }

    /// A flexible record that passes every rule without warnings.
    pub fn valid_record() -> InvoiceRecord {
        InvoiceRecord::new(RecordShape::Flexible)
            .with_field(fields::INVOICE_NUMBER, "INV-2025-001234")
            .with_field(fields::INVOICE_DATE, "2025-11-10")
            .with_field(fields::INVOICE_TYPE, "Commercial Invoice")
            .with_field(fields::SUPPLIER, "Tech Supplies International Inc.")
            .with_field(fields::SUPPLIER_ADDRESS, "1234 Technology Ave, Silicon Valley, CA 94025, USA")
            .with_field(fields::CUSTOMER, "Importadora Colombiana SAS")
            .with_field(fields::CUSTOMER_ADDRESS, "Calle 100 No. 10-20, Bogota, Colombia")
            .with_field(fields::CUSTOMER_TAX_ID, "900123456-7")
            .with_field(fields::CURRENCY, "USD")
            .with_field(fields::INCOTERM, "FOB")
            .with_field(fields::PORT_OF_LOADING, "Los Angeles, CA")
            .with_field(fields::PORT_OF_DISCHARGE, "Cartagena, Colombia")
            .with_field(fields::COUNTRY_OF_ORIGIN, "United States")
            .with_field(fields::TOTAL_INVOICE_VALUE, "15000.00")
            .with_item(LineItem::new(
                "Laptop Dell Latitude 5520, Intel Core i7, 16GB RAM, 512GB SSD",
                "50",
                "250.00",
                "12500.00",
            ))
            .with_item(LineItem::new(
                "Wireless mouse Logitech MX Master 3, bluetooth, graphite",
                "100",
                "25.00",
                "2500.00",
            ))
    }

    /// Run one rule with the record's default policy.
    pub fn run(rule: &dyn Rule, record: &InvoiceRecord) -> ValidationOutcome {
        let policy = match record.shape() {
            RecordShape::Flexible => RulePolicy::flexible(),
            RecordShape::Fixed => RulePolicy::fixed(),
        };
        run_with(rule, record, &policy, &AdvisoryPort::disabled())
    }

    pub fn run_with(
        rule: &dyn Rule,
        record: &InvoiceRecord,
        policy: &RulePolicy,
        advisory: &AdvisoryPort,
    ) -> ValidationOutcome {
        let ctx = RuleContext {
            record,
            policy,
            today: today(),
            advisory,
        };
        let mut out = ResultAggregator::new();
        rule.check(&ctx, &mut out);
        out.finish()
    }
}
