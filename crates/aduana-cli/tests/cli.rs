use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const VALID_INVOICE: &str = r#"{
    "Fields": [
        { "Fields": "InvoiceNumber", "Value": "INV-2025-001234" },
        { "Fields": "InvoiceDate", "Value": "2025-11-10" },
        { "Fields": "InvoiceType", "Value": "Commercial Invoice" },
        { "Fields": "Supplier", "Value": "Tech Supplies International Inc." },
        { "Fields": "SupplierAddress", "Value": "1234 Technology Ave, Silicon Valley, CA" },
        { "Fields": "Customer", "Value": "Importadora Colombiana SAS" },
        { "Fields": "CustomerAddress", "Value": "Calle 100 No. 10-20, Bogota" },
        { "Fields": "CustomerTaxID", "Value": "900123456-7" },
        { "Fields": "Currency", "Value": "USD" },
        { "Fields": "Incoterm", "Value": "FOB" },
        { "Fields": "PortOfLoading", "Value": "Los Angeles" },
        { "Fields": "PortOfDischarge", "Value": "Cartagena" },
        { "Fields": "CountryOfOrigin", "Value": "United States" },
        { "Fields": "TotalInvoiceValue", "Value": 12500 }
    ],
    "Table": [{
        "Description": "Laptop Dell Latitude 5520, Intel Core i7, 16GB RAM",
        "Quantity": 50,
        "UnitPrice": 250,
        "NetValuePerItem": 12500
    }]
}"#;

const PRO_FORMA_INVOICE: &str = r#"{
    "numero_factura": "PF-77",
    "fecha_expedicion": "2025-11-01",
    "lugar_expedicion": "Shanghai, China",
    "nombre_vendedor": "Supplier Ltd",
    "direccion_vendedor": "123 Business St",
    "pais_vendedor": "China",
    "nombre_comprador": "Importadora Colombia",
    "direccion_comprador": "Calle 100 No 10",
    "ciudad_comprador": "Bogota",
    "items": [{ "descripcion": "Parts", "cantidad": 100, "precio_unitario": 10, "precio_total": 1000 }],
    "precio_neto_factura": 1000,
    "moneda": "USD",
    "incoterm": "CIF",
    "lugar_entrega": "Cartagena",
    "es_definitiva": false
}"#;

fn aduana() -> Command {
    Command::cargo_bin("aduana").unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_validate_compliant_invoice() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "invoice.json", VALID_INVOICE);

    aduana()
        .args(["validate", &input, "--date", "2025-11-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"compliant\": true"))
        .stdout(predicate::str::contains("INV-2025-001234"));
}

#[test]
fn test_validate_reports_dian_codes() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "proforma.json", PRO_FORMA_INVOICE);

    aduana()
        .args(["validate", &input, "--date", "2025-11-20", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("REJECTED"))
        .stdout(predicate::str::contains("[DIAN_001]"))
        .stdout(predicate::str::contains("[DIAN_008]"))
        .stdout(predicate::str::contains("[DIAN_011]"));
}

#[test]
fn test_validate_structural_failure() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "broken.json", r#"{ "numero_factura": "X-1" }"#);

    aduana()
        .args(["validate", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("DIAN_000"))
        .stdout(predicate::str::contains("\"field\": \"general\""));
}

#[test]
fn test_validate_missing_file() {
    aduana()
        .args(["validate", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_batch_writes_reports_and_summary() {
    let dir = TempDir::new().unwrap();
    let batch = format!("[{}, {}, 42]", VALID_INVOICE, PRO_FORMA_INVOICE);
    write(dir.path(), "lote.json", &batch);
    write(dir.path(), "single.json", VALID_INVOICE);
    let out = dir.path().join("out");
    let pattern = dir.path().join("*.json").to_string_lossy().into_owned();

    aduana()
        .args(["batch", &pattern, "--summary", "-j", "2", "--date", "2025-11-20"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Validated 4 invoices from 2 files"));

    let report = fs::read_to_string(out.join("lote.report.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(report["summary"]["total"], 3);
    assert_eq!(report["summary"]["approved"], 1);
    assert_eq!(report["invoices"][2]["invoice_number"], "N/A");

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,index,invoice_number,status"));
    assert!(summary.contains("PF-77"));
    assert!(summary.contains("DIAN_000"));
}

#[test]
fn test_batch_without_matches() {
    let dir = TempDir::new().unwrap();
    let pattern = dir.path().join("*.json").to_string_lossy().into_owned();

    aduana()
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn test_requirements() {
    aduana()
        .args(["requirements", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CT-COA-0124"))
        .stdout(predicate::str::contains("identification"));
}

#[test]
fn test_suggest_falls_back_to_generic_text() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    aduana()
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();

    aduana()
        .arg("--config")
        .arg(&config)
        .args(["suggest", "PortOfLoading", "--context", "blank"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DIAN"));
}

#[test]
fn test_config_roundtrip() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    aduana()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "batch.jobs", "8"])
        .assert()
        .success();

    aduana()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "batch.jobs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8"));

    aduana()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "batch.jobs", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("batch.jobs must be at least 1"));

    aduana()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "no.such.key"])
        .assert()
        .failure();
}
