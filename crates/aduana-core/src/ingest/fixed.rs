//! Flat fixed-schema invoices keyed in Spanish.

use serde::Deserialize;
use serde_json::Value;

use super::lenient_string;
use crate::error::IngestError;
use crate::models::record::{fields, InvoiceRecord, LineItem, RecordShape};
use crate::rules::parse_flag;

const PRO_FORMA: &str = "Pro Forma";
const COMMERCIAL_INVOICE: &str = "Commercial Invoice";

#[derive(Deserialize)]
struct FixedInvoice {
    #[serde(deserialize_with = "lenient_string")]
    numero_factura: String,
    #[serde(deserialize_with = "lenient_string")]
    fecha_expedicion: String,
    #[serde(deserialize_with = "lenient_string")]
    lugar_expedicion: String,
    #[serde(deserialize_with = "lenient_string")]
    nombre_vendedor: String,
    #[serde(deserialize_with = "lenient_string")]
    direccion_vendedor: String,
    #[serde(deserialize_with = "lenient_string")]
    pais_vendedor: String,
    #[serde(deserialize_with = "lenient_string")]
    nombre_comprador: String,
    #[serde(deserialize_with = "lenient_string")]
    direccion_comprador: String,
    #[serde(deserialize_with = "lenient_string")]
    ciudad_comprador: String,
    items: Vec<FixedItem>,
    #[serde(deserialize_with = "lenient_string")]
    precio_neto_factura: String,
    #[serde(deserialize_with = "lenient_string")]
    moneda: String,
    #[serde(deserialize_with = "lenient_string")]
    incoterm: String,
    #[serde(deserialize_with = "lenient_string")]
    lugar_entrega: String,

    #[serde(default, deserialize_with = "lenient_string")]
    descuentos: String,
    #[serde(default, deserialize_with = "lenient_string")]
    concepto_descuento: String,
    #[serde(default, deserialize_with = "lenient_string")]
    gastos_transporte: String,
    #[serde(default, deserialize_with = "lenient_string")]
    costo_seguro: String,
    #[serde(default, deserialize_with = "lenient_string")]
    es_original: String,
    #[serde(default, deserialize_with = "lenient_string")]
    es_definitiva: String,
}

#[derive(Deserialize)]
struct FixedItem {
    #[serde(deserialize_with = "lenient_string")]
    descripcion: String,
    #[serde(deserialize_with = "lenient_string")]
    cantidad: String,
    #[serde(deserialize_with = "lenient_string")]
    precio_unitario: String,
    #[serde(deserialize_with = "lenient_string")]
    precio_total: String,
}

pub(super) fn ingest(value: &Value) -> Result<InvoiceRecord, IngestError> {
    let invoice =
        FixedInvoice::deserialize(value).map_err(|e| IngestError::Malformed(e.to_string()))?;

    // Flags default to true when absent or unrecognizable
    let document_type = match parse_flag(&invoice.es_definitiva) {
        Some(false) => PRO_FORMA,
        _ => COMMERCIAL_INVOICE,
    };
    let is_original = parse_flag(&invoice.es_original).unwrap_or(true);
    let buyer_address = [invoice.direccion_comprador.trim(), invoice.ciudad_comprador.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let mut record = InvoiceRecord::new(RecordShape::Fixed)
        .with_field(fields::INVOICE_NUMBER, invoice.numero_factura)
        .with_field(fields::INVOICE_DATE, invoice.fecha_expedicion)
        .with_field(fields::ISSUE_PLACE, invoice.lugar_expedicion)
        .with_field(fields::INVOICE_TYPE, document_type)
        .with_field(fields::IS_ORIGINAL, is_original.to_string())
        .with_field(fields::SUPPLIER, invoice.nombre_vendedor)
        .with_field(fields::SUPPLIER_ADDRESS, invoice.direccion_vendedor)
        .with_field(fields::SUPPLIER_COUNTRY, invoice.pais_vendedor)
        .with_field(fields::CUSTOMER, invoice.nombre_comprador)
        .with_field(fields::CUSTOMER_ADDRESS, buyer_address)
        .with_field(fields::TOTAL_INVOICE_VALUE, invoice.precio_neto_factura)
        .with_field(fields::CURRENCY, invoice.moneda)
        .with_field(fields::INCOTERM, invoice.incoterm)
        .with_field(fields::DELIVERY_PLACE, invoice.lugar_entrega)
        .with_field(fields::DISCOUNT, invoice.descuentos)
        .with_field(fields::DISCOUNT_REASON, invoice.concepto_descuento)
        .with_field(fields::FREIGHT_COST, invoice.gastos_transporte)
        .with_field(fields::INSURANCE_COST, invoice.costo_seguro);

    for item in invoice.items {
        record.push_item(LineItem::new(
            item.descripcion,
            item.cantidad,
            item.precio_unitario,
            item.precio_total,
        ));
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::Numeric;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "numero_factura": "INV-2025-001",
            "fecha_expedicion": "2025-11-01",
            "lugar_expedicion": "Shanghai, China",
            "nombre_vendedor": "Supplier Ltd",
            "direccion_vendedor": "123 Business St",
            "pais_vendedor": "China",
            "nombre_comprador": "Importadora Colombia",
            "direccion_comprador": "Calle 100 No 10",
            "ciudad_comprador": "Bogotá",
            "items": [{
                "descripcion": "Componentes electronicos resistencias 10k",
                "cantidad": 100,
                "precio_unitario": 10.0,
                "precio_total": 1000.0
            }],
            "precio_neto_factura": 1000.0,
            "moneda": "USD",
            "incoterm": "FOB",
            "lugar_entrega": "Puerto Shanghai"
        })
    }

    #[test]
    fn test_maps_onto_canonical_fields() {
        let record = ingest(&sample()).unwrap();
        assert_eq!(record.shape(), RecordShape::Fixed);
        assert_eq!(record.invoice_number(), "INV-2025-001");
        assert_eq!(record.issue_place(), "Shanghai, China");
        assert_eq!(record.document_type(), COMMERCIAL_INVOICE);
        assert_eq!(record.is_original(), Some(true));
        assert_eq!(record.buyer_address(), "Calle 100 No 10, Bogotá");
        assert_eq!(record.text(fields::SUPPLIER_COUNTRY), "China");
        assert_eq!(record.declared_total(), Numeric::Value(Decimal::from(1000)));
        assert_eq!(record.discount(), Numeric::Absent);
        assert_eq!(record.items()[0].quantity().or_zero(), Decimal::from(100));
    }

    #[test]
    fn test_non_definitive_is_pro_forma() {
        let mut doc = sample();
        doc["es_definitiva"] = json!(false);
        doc["es_original"] = json!(false);

        let record = ingest(&doc).unwrap();
        assert_eq!(record.document_type(), PRO_FORMA);
        assert_eq!(record.is_original(), Some(false));
    }

    #[test]
    fn test_flags_given_as_text() {
        let mut doc = sample();
        doc["es_definitiva"] = json!("false");
        doc["es_original"] = json!("No");

        let record = ingest(&doc).unwrap();
        assert_eq!(record.document_type(), PRO_FORMA);
        assert_eq!(record.is_original(), Some(false));

        doc["es_definitiva"] = json!(null);
        doc["es_original"] = json!("1");
        let record = ingest(&doc).unwrap();
        assert_eq!(record.document_type(), COMMERCIAL_INVOICE);
        assert_eq!(record.is_original(), Some(true));
    }

    #[test]
    fn test_missing_required_key_is_rejected() {
        let mut doc = sample();
        doc.as_object_mut().unwrap().remove("moneda");

        let err = ingest(&doc).unwrap_err();
        match err {
            IngestError::Malformed(msg) => assert!(msg.contains("moneda")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
