//! Invoice record model with typed accessors over a name/value field map.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ingest::lenient_string;
use crate::rules::extract::{parse_amount, parse_date, parse_flag};

/// Canonical field names of the flexible record layout.
pub mod fields {
    pub const INVOICE_NUMBER: &str = "InvoiceNumber";
    pub const INVOICE_DATE: &str = "InvoiceDate";
    pub const ISSUE_PLACE: &str = "IssuePlace";
    pub const INVOICE_TYPE: &str = "InvoiceType";
    pub const IS_ORIGINAL: &str = "IsOriginal";
    pub const SUPPLIER: &str = "Supplier";
    pub const SUPPLIER_ADDRESS: &str = "SupplierAddress";
    pub const SUPPLIER_TAX_ID: &str = "SupplierTaxID";
    pub const SUPPLIER_COUNTRY: &str = "SupplierCountry";
    pub const CUSTOMER: &str = "Customer";
    pub const CUSTOMER_ADDRESS: &str = "CustomerAddress";
    pub const CUSTOMER_TAX_ID: &str = "CustomerTaxID";
    pub const CURRENCY: &str = "Currency";
    pub const INCOTERM: &str = "Incoterm";
    pub const DELIVERY_PLACE: &str = "DeliveryPlace";
    pub const PORT_OF_LOADING: &str = "PortOfLoading";
    pub const PORT_OF_DISCHARGE: &str = "PortOfDischarge";
    pub const COUNTRY_OF_ORIGIN: &str = "CountryOfOrigin";
    pub const TOTAL_INVOICE_VALUE: &str = "TotalInvoiceValue";
    pub const INSURANCE_COST: &str = "InsuranceCost";
    pub const FREIGHT_COST: &str = "FreightCost";
    pub const DISCOUNT: &str = "Discount";
    pub const DISCOUNT_REASON: &str = "DiscountReason";
}

/// Wire layout the record was ingested from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordShape {
    /// `Fields` name/value list plus a `Table` of item rows.
    #[default]
    Flexible,
    /// Flat object with a fixed set of keys.
    Fixed,
}

/// A numeric value read from a string field.
///
/// Rules that only need arithmetic use [`Numeric::or_zero`]; rules that must
/// tell "missing" from "garbled" from "zero" match on the variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Numeric {
    /// The field is missing or blank.
    Absent,
    /// The field holds text that is not a number.
    Unparseable(String),
    /// A parsed value.
    Value(Decimal),
}

impl Numeric {
    /// Parse a raw field value.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Numeric::Absent;
        }
        match parse_amount(raw) {
            Some(value) => Numeric::Value(value),
            None => Numeric::Unparseable(raw.to_string()),
        }
    }

    /// The value, with absent and unparseable input read as zero.
    pub fn or_zero(&self) -> Decimal {
        match self {
            Numeric::Value(value) => *value,
            Numeric::Absent | Numeric::Unparseable(_) => Decimal::ZERO,
        }
    }

    pub fn is_unparseable(&self) -> bool {
        matches!(self, Numeric::Unparseable(_))
    }

    /// Parsed value, if any.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Numeric::Value(value) => Some(*value),
            _ => None,
        }
    }
}

/// One merchandise row of the invoice table.
///
/// Values are kept as the strings that arrived on the wire; typed accessors
/// parse them on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    /// Stock keeping unit.
    #[serde(rename = "SKU", deserialize_with = "lenient_string")]
    pub sku: String,

    /// Merchandise description.
    #[serde(rename = "Description", deserialize_with = "lenient_string")]
    pub description: String,

    /// Quantity.
    #[serde(rename = "Quantity", deserialize_with = "lenient_string")]
    pub quantity: String,

    /// Unit of measure.
    #[serde(rename = "UnitOfMeasurement", deserialize_with = "lenient_string")]
    pub unit: String,

    /// Unit price.
    #[serde(rename = "UnitPrice", deserialize_with = "lenient_string")]
    pub unit_price: String,

    /// Declared line total.
    #[serde(rename = "NetValuePerItem", deserialize_with = "lenient_string")]
    pub line_total: String,

    /// Line currency.
    #[serde(rename = "Currency", deserialize_with = "lenient_string")]
    pub currency: String,

    /// Harmonized System code.
    #[serde(rename = "HSCode", deserialize_with = "lenient_string")]
    pub hs_code: String,

    /// Weight, free text (e.g. "2.5 kg").
    #[serde(rename = "Weight", deserialize_with = "lenient_string")]
    pub weight: String,
}

impl LineItem {
    /// Create an item from its description and the three numeric columns.
    pub fn new(
        description: impl Into<String>,
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
        line_total: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
            line_total: line_total.into(),
            ..Self::default()
        }
    }

    pub fn description(&self) -> &str {
        self.description.trim()
    }

    pub fn quantity(&self) -> Numeric {
        Numeric::parse(&self.quantity)
    }

    pub fn unit_price(&self) -> Numeric {
        Numeric::parse(&self.unit_price)
    }

    pub fn line_total(&self) -> Numeric {
        Numeric::parse(&self.line_total)
    }
}

/// An invoice under validation.
///
/// Built once from untrusted input and never mutated during evaluation.
/// Every accessor returns a sentinel (empty string, [`Numeric::Absent`],
/// `None`) for missing fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    shape: RecordShape,
    fields: HashMap<String, String>,
    items: Vec<LineItem>,
}

impl InvoiceRecord {
    /// Create an empty record of the given shape.
    pub fn new(shape: RecordShape) -> Self {
        Self {
            shape,
            fields: HashMap::new(),
            items: Vec::new(),
        }
    }

    /// Set a field. The first value given for a name wins.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_field(name, value);
        self
    }

    /// Append a line item.
    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub(crate) fn insert_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(name.into()).or_insert_with(|| value.into());
    }

    pub(crate) fn push_item(&mut self, item: LineItem) {
        self.items.push(item);
    }

    pub fn shape(&self) -> RecordShape {
        self.shape
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Trimmed text of a field, empty when missing.
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(|v| v.trim()).unwrap_or("")
    }

    /// Numeric value of a field.
    pub fn amount(&self, name: &str) -> Numeric {
        Numeric::parse(self.text(name))
    }

    pub fn invoice_number(&self) -> &str {
        self.text(fields::INVOICE_NUMBER)
    }

    /// Raw issue date text.
    pub fn issue_date_text(&self) -> &str {
        self.text(fields::INVOICE_DATE)
    }

    /// Issue date, when it matches one of the accepted formats.
    pub fn issue_date(&self) -> Option<NaiveDate> {
        parse_date(self.issue_date_text())
    }

    pub fn issue_place(&self) -> &str {
        self.text(fields::ISSUE_PLACE)
    }

    pub fn document_type(&self) -> &str {
        self.text(fields::INVOICE_TYPE)
    }

    /// Originality flag; `None` when missing or not a recognizable boolean.
    pub fn is_original(&self) -> Option<bool> {
        parse_flag(self.text(fields::IS_ORIGINAL))
    }

    pub fn seller_name(&self) -> &str {
        self.text(fields::SUPPLIER)
    }

    pub fn seller_address(&self) -> &str {
        self.text(fields::SUPPLIER_ADDRESS)
    }

    pub fn buyer_name(&self) -> &str {
        self.text(fields::CUSTOMER)
    }

    pub fn buyer_address(&self) -> &str {
        self.text(fields::CUSTOMER_ADDRESS)
    }

    pub fn buyer_tax_id(&self) -> &str {
        self.text(fields::CUSTOMER_TAX_ID)
    }

    pub fn currency(&self) -> &str {
        self.text(fields::CURRENCY)
    }

    pub fn incoterm(&self) -> &str {
        self.text(fields::INCOTERM)
    }

    pub fn port_of_loading(&self) -> &str {
        self.text(fields::PORT_OF_LOADING)
    }

    pub fn port_of_discharge(&self) -> &str {
        self.text(fields::PORT_OF_DISCHARGE)
    }

    pub fn country_of_origin(&self) -> &str {
        self.text(fields::COUNTRY_OF_ORIGIN)
    }

    /// Declared grand total (net invoice value).
    pub fn declared_total(&self) -> Numeric {
        self.amount(fields::TOTAL_INVOICE_VALUE)
    }

    pub fn insurance_cost(&self) -> Numeric {
        self.amount(fields::INSURANCE_COST)
    }

    pub fn freight_cost(&self) -> Numeric {
        self.amount(fields::FREIGHT_COST)
    }

    pub fn discount(&self) -> Numeric {
        self.amount(fields::DISCOUNT)
    }

    pub fn discount_reason(&self) -> &str {
        self.text(fields::DISCOUNT_REASON)
    }
}
