//! WASM bindings for DIAN commercial-invoice compliance checks.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Only the deterministic rules are available here.

use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use aduana_core::rules::parse_amount;
use aduana_core::{BatchEntry, BatchReport, RecordShape, Validator};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Validate one invoice given as JSON text.
#[wasm_bindgen]
pub fn validate_invoice(json: &str) -> Result<JsValue, JsValue> {
    InvoiceValidator::new().validate(json)
}

/// Validate an array of invoices (or a single one) given as JSON text.
#[wasm_bindgen]
pub fn validate_batch(json: &str) -> Result<JsValue, JsValue> {
    InvoiceValidator::new().validate_batch(json)
}

/// The regulation, booklet and mandatory field groups.
#[wasm_bindgen]
pub fn requirements() -> Result<JsValue, JsValue> {
    to_js(&aduana_core::requirements())
}

/// Parse an amount as written on invoices (e.g. "$15,000.50").
#[wasm_bindgen]
pub fn parse_invoice_amount(amount: &str) -> Option<f64> {
    parse_amount(amount).and_then(|d| d.to_string().parse().ok())
}

/// Validator class for browser use.
#[wasm_bindgen]
pub struct InvoiceValidator {
    validator: Validator,
    date: Option<NaiveDate>,
}

#[wasm_bindgen]
impl InvoiceValidator {
    /// Create a validator with default policies.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            validator: Validator::new(),
            date: None,
        }
    }

    /// Evaluate against a fixed date (YYYY-MM-DD) instead of today.
    #[wasm_bindgen]
    pub fn set_date(&mut self, date: &str) -> Result<(), JsValue> {
        let parsed = date
            .parse::<NaiveDate>()
            .map_err(|e| JsValue::from_str(&format!("invalid date '{date}': {e}")))?;
        self.date = Some(parsed);
        Ok(())
    }

    /// Apply strict totals (zero tolerance) to flexible records too.
    #[wasm_bindgen]
    pub fn set_strict_totals(&mut self, strict: bool) {
        let mut policy = aduana_core::RulePolicy::flexible();
        if strict {
            policy.total_check = aduana_core::TotalCheck::Strict;
        }
        self.validator = self.validator.clone().with_policy(RecordShape::Flexible, policy);
    }

    /// Validate one invoice.
    #[wasm_bindgen]
    pub fn validate(&self, json: &str) -> Result<JsValue, JsValue> {
        let entry = evaluate_single(&self.validator, json, self.today())
            .map_err(|e| JsValue::from_str(&e))?;
        to_js(&entry)
    }

    /// Validate a batch of invoices.
    #[wasm_bindgen]
    pub fn validate_batch(&self, json: &str) -> Result<JsValue, JsValue> {
        let report = evaluate_batch(&self.validator, json, self.today())
            .map_err(|e| JsValue::from_str(&e))?;
        to_js(&report)
    }

    fn today(&self) -> NaiveDate {
        self.date.unwrap_or_else(browser_today)
    }
}

impl Default for InvoiceValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Today's date from the JS clock.
fn browser_today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .unwrap_or_default()
}

fn evaluate_single(validator: &Validator, json: &str, today: NaiveDate) -> Result<BatchEntry, String> {
    let document: serde_json::Value =
        serde_json::from_str(json).map_err(|e| format!("invalid JSON: {e}"))?;
    if document.is_array() {
        return Err("expected a single invoice, found an array".to_string());
    }

    validator
        .evaluate_batch_json_at(&document, today)
        .invoices
        .into_iter()
        .next()
        .ok_or_else(|| "no invoice evaluated".to_string())
}

fn evaluate_batch(validator: &Validator, json: &str, today: NaiveDate) -> Result<BatchReport, String> {
    let document: serde_json::Value =
        serde_json::from_str(json).map_err(|e| format!("invalid JSON: {e}"))?;
    Ok(validator.evaluate_batch_json_at(&document, today))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
