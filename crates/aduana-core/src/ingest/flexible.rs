//! `{"Fields": [{"Fields": name, "Value": v}], "Table": [{...}]}` documents.

use serde::Deserialize;
use serde_json::Value;

use super::lenient_string;
use crate::error::IngestError;
use crate::models::record::{InvoiceRecord, LineItem, RecordShape};

#[derive(Deserialize)]
struct FlexibleInvoice {
    #[serde(rename = "Fields", default)]
    fields: Vec<FieldEntry>,

    #[serde(rename = "Table", default)]
    table: Vec<LineItem>,
}

#[derive(Deserialize)]
struct FieldEntry {
    #[serde(rename = "Fields", alias = "Field", alias = "Name")]
    name: String,

    #[serde(rename = "Value", default, deserialize_with = "lenient_string")]
    value: String,
}

pub(super) fn ingest(value: &Value) -> Result<InvoiceRecord, IngestError> {
    let invoice = FlexibleInvoice::deserialize(value)
        .map_err(|e| IngestError::Malformed(e.to_string()))?;

    let mut record = InvoiceRecord::new(RecordShape::Flexible);
    for entry in invoice.fields {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(IngestError::InvalidField {
                field: "Fields".to_string(),
                reason: "field entry without a name".to_string(),
            });
        }
        record.insert_field(name, entry.value);
    }
    for item in invoice.table {
        record.push_item(item);
    }

    Ok(record)
}
