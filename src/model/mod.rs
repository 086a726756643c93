mod lenient;
mod raw;

pub use lenient::{parse_amount, Amount, Text};
pub use raw::{parse_payload, RawBill, RawLineItem};

use serde::Serialize;

/// A line item after alias normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub quantity: f64,
    pub unit_price: f64,
    pub taxable_value: f64,
    pub gst_rate_percent: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub igst: f64,
    /// Opaque product reference from the backend
    pub product_identifier: String,
    pub product_name: Option<String>,
    pub hsn_code: String,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            quantity: 0.0,
            unit_price: 0.0,
            taxable_value: 0.0,
            gst_rate_percent: 0.0,
            cgst: 0.0,
            sgst: 0.0,
            igst: 0.0,
            product_identifier: NOT_AVAILABLE.to_string(),
            product_name: None,
            hsn_code: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Placeholder shown for missing identifiers and codes
pub const NOT_AVAILABLE: &str = "N/A";

/// Billing party, as a full record or just a name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RetailerRef {
    Record(Retailer),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Retailer {
    pub name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub gstin: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Company {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub gstin: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Totals as sent by the backend. `None` means the field was absent or null.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ReportedTotals {
    pub taxable: Option<f64>,
    pub cgst: Option<f64>,
    pub sgst: Option<f64>,
    pub igst: Option<f64>,
    pub grand_total: Option<f64>,
}

/// A vendor bill after alias normalization
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Invoice {
    pub invoice_number: Option<String>,
    pub retailer: Option<RetailerRef>,
    pub retailer_name: Option<String>,
    pub company: Option<Company>,
    pub invoice_date: Option<String>,
    pub payment_mode: Option<String>,
    pub payment_status: Option<String>,
    pub items: Vec<LineItem>,
    pub reported: ReportedTotals,
}

impl Invoice {
    /// Structured retailer record, if the backend sent one
    pub fn retailer_record(&self) -> Option<&Retailer> {
        match &self.retailer {
            Some(RetailerRef::Record(record)) => Some(record),
            _ => None,
        }
    }
}
