//! Common regex patterns and controlled vocabularies.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "Pro Forma", "PROFORMA", "pro-forma invoice", "ProformaInvoice"
    pub static ref PRO_FORMA: Regex = Regex::new(
        r"(?i)\bpro[\s\-_]*forma"
    ).unwrap();

    // Thousands separators and currency decoration around a number
    pub static ref AMOUNT_NOISE: Regex = Regex::new(
        r"[,\s\u{00a0}'_$€£¥]"
    ).unwrap();

    // Plain decimal number after cleanup
    pub static ref PLAIN_NUMBER: Regex = Regex::new(
        r"^[+-]?(?:\d+\.?\d*|\.\d+)$"
    ).unwrap();
}

/// Currencies accepted without a warning. Advisory, not exhaustive.
pub const COMMON_CURRENCIES: [&str; 8] = ["USD", "EUR", "COP", "CNY", "GBP", "JPY", "CAD", "MXN"];

/// Incoterms 2020.
pub const INCOTERMS_2020: [&str; 11] = [
    "EXW", "FCA", "FAS", "FOB", // E and F groups
    "CFR", "CIF", "CPT", "CIP", // C group
    "DAP", "DPU", "DDP", // D group
];

/// Terms under which the seller must arrange insurance.
pub const INSURANCE_TERMS: [&str; 2] = ["CIF", "CIP"];

/// Terms under which the seller usually pays main carriage.
pub const FREIGHT_TERMS: [&str; 7] = ["CFR", "CPT", "CIF", "CIP", "DAP", "DPU", "DDP"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pro_forma_variants() {
        assert!(PRO_FORMA.is_match("Pro Forma Invoice"));
        assert!(PRO_FORMA.is_match("PROFORMA"));
        assert!(PRO_FORMA.is_match("pro-forma"));
        assert!(PRO_FORMA.is_match("ProformaInvoice"));
        assert!(PRO_FORMA.is_match("PROFORMA1"));
        assert!(PRO_FORMA.is_match("Pro-FormaCommercial"));
        assert!(!PRO_FORMA.is_match("Commercial Invoice"));
        assert!(!PRO_FORMA.is_match("Informal proposal for a quotation"));
    }
}
