use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::{RetailerRef, NOT_AVAILABLE};

pub const UNKNOWN_RETAILER: &str = "Unknown Retailer";

/// Name to show for the billed party.
///
/// A record's name wins, then a bare name string, then the bill's separate
/// retailer name field.
pub fn resolve_retailer_display_name(
    retailer: Option<&RetailerRef>,
    fallback_name: Option<&str>,
) -> String {
    match retailer {
        Some(RetailerRef::Record(record)) => {
            if let Some(name) = record.name.as_deref().filter(|n| !n.is_empty()) {
                return name.to_string();
            }
        }
        Some(RetailerRef::Name(name)) if !name.trim().is_empty() => return name.clone(),
        _ => {}
    }

    match fallback_name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => UNKNOWN_RETAILER.to_string(),
    }
}

/// `"N/A"` for absent or blank values
pub fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(NOT_AVAILABLE)
}

/// Two decimal places, non-finite values show as zero
pub fn format_amount(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "0.00".to_string()
    }
}

/// Currency symbol, thousands separators and two decimal places
pub fn format_money(currency_symbol: &str, value: f64) -> String {
    let rounded = format_amount(value);
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let negative = whole.starts_with('-');
    let digits = whole.trim_start_matches('-');
    let grouped = group_digits(digits);

    if negative {
        format!("-{}{}.{}", currency_symbol, grouped, frac)
    } else {
        format!("{}{}.{}", currency_symbol, grouped, frac)
    }
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// Render a backend date as DD/MM/YYYY. Unrecognized formats are shown as sent.
pub fn format_invoice_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };

    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
