//! Turning untrusted JSON into invoice records.
//!
//! Two layouts are accepted: the flexible `Fields`/`Table` document produced
//! by upstream document-extraction tools, and the fixed flat schema with
//! Spanish keys. Both end up as the same [`InvoiceRecord`].

mod fixed;
mod flexible;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::error::IngestError;
use crate::models::record::InvoiceRecord;

/// Ingest one invoice document.
pub fn ingest(value: &Value) -> Result<InvoiceRecord, IngestError> {
    let Value::Object(map) = value else {
        return Err(IngestError::NotAnObject(json_kind(value)));
    };

    if map.contains_key("Fields") || map.contains_key("Table") {
        debug!("ingesting flexible invoice");
        flexible::ingest(value)
    } else if map.contains_key("numero_factura") {
        debug!("ingesting fixed-schema invoice");
        fixed::ingest(value)
    } else {
        Err(IngestError::UnknownShape)
    }
}

/// Ingest a batch document. A single object counts as a batch of one.
pub fn ingest_batch(document: &Value) -> Vec<Result<InvoiceRecord, IngestError>> {
    match document {
        Value::Array(items) => items.iter().map(ingest).collect(),
        other => vec![ingest(other)],
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Deserialize strings, numbers and booleans into a string; null becomes empty.
///
/// Upstream tools emit numeric columns either as JSON numbers or as text.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected text or number, found {}",
            json_kind(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::RecordShape;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_shape_detection() {
        let flexible = ingest(&json!({ "Fields": [], "Table": [] })).unwrap();
        assert_eq!(flexible.shape(), RecordShape::Flexible);

        assert_eq!(ingest(&json!({ "foo": 1 })), Err(IngestError::UnknownShape));
        assert_eq!(ingest(&json!([1, 2])), Err(IngestError::NotAnObject("an array")));
    }

    #[test]
    fn test_single_object_is_batch_of_one() {
        let results = ingest_batch(&json!({ "Fields": [] }));
        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());
    }

    #[test]
    fn test_batch_keeps_failures_in_place() {
        let results = ingest_batch(&json!([{ "Fields": [] }, "garbage", { "Table": [] }]));
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
