//! Soft-fail parsing of string-typed invoice values.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::patterns::{AMOUNT_NOISE, PLAIN_NUMBER};

/// Accepted issue date formats, tried in order.
pub const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%b-%Y", "%d/%m/%Y"];

/// Parse an amount such as "15,000.00", "$ 1 250.5" or "42".
///
/// Thousands separators and currency symbols are dropped. Returns `None`
/// for anything that is not a plain decimal number afterwards.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = AMOUNT_NOISE.replace_all(s.trim(), "");
    if !PLAIN_NUMBER.is_match(&cleaned) {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Parse a date with the first matching format of [`DATE_FORMATS`].
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

/// Parse a yes/no flag.
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "si" | "sí" | "1" | "original" => Some(true),
        "false" | "no" | "n" | "0" | "copy" | "copia" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("15000.00"), Some(dec("15000.00")));
        assert_eq!(parse_amount("15,000.00"), Some(dec("15000")));
        assert_eq!(parse_amount("$ 1 250.5"), Some(dec("1250.5")));
        assert_eq!(parse_amount("-3"), Some(dec("-3")));
        assert_eq!(parse_amount("12kg"), None);
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
        assert_eq!(parse_date("2025-11-10"), Some(expected));
        assert_eq!(parse_date("11/10/2025"), Some(expected));
        assert_eq!(parse_date("10-Nov-2025"), Some(expected));
        assert_eq!(parse_date("10-NOV-2025"), Some(expected));
        assert_eq!(parse_date(" 2025-11-10 "), Some(expected));
    }

    #[test]
    fn test_month_first_wins_over_day_first() {
        // Both readings are valid; MM/DD/YYYY is tried first
        assert_eq!(parse_date("03/04/2025"), NaiveDate::from_ymd_opt(2025, 3, 4));
        // Only DD/MM/YYYY can read a day of 25
        assert_eq!(parse_date("25/04/2025"), NaiveDate::from_ymd_opt(2025, 4, 25));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2025-13-40"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
