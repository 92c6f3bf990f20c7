//! Static catalogue of the mandatory commercial-invoice content.

use serde::Serialize;

/// Governing regulation.
pub const NORMATIVE: &str = "Resolución Andina 1684/2014 - Art. 9";

/// DIAN booklet describing the requirements.
pub const BOOKLET: &str = "CT-COA-0124";

/// A group of mandatory invoice fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldGroup {
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

/// The regulation, its booklet and the mandatory field groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Requirements {
    pub normative: &'static str,
    pub booklet: &'static str,
    pub mandatory_fields: &'static [FieldGroup],
}

const GROUPS: &[FieldGroup] = &[
    FieldGroup {
        name: "identification",
        fields: &["Invoice number", "Issue date", "Issue place"],
    },
    FieldGroup {
        name: "parties",
        fields: &["Seller name and address", "Buyer name and address"],
    },
    FieldGroup {
        name: "merchandise",
        fields: &["Detailed description", "Quantity", "Unit price", "Line total"],
    },
    FieldGroup {
        name: "values",
        fields: &["Net invoice total", "Transaction currency", "Itemized discounts"],
    },
    FieldGroup {
        name: "terms",
        fields: &["Incoterm", "Delivery place", "Freight cost", "Insurance cost"],
    },
];

pub fn requirements() -> Requirements {
    Requirements {
        normative: NORMATIVE,
        booklet: BOOKLET,
        mandatory_fields: GROUPS,
    }
}
