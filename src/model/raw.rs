//! Backend records as they arrive, with every known field alias.
//!
//! Nothing past [`RawBill::normalize`] sees an alias: the canonical
//! [`Invoice`] and [`LineItem`] carry one field per concept.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::lenient::{Amount, Text};
use super::{Company, Invoice, LineItem, ReportedTotals, Retailer, RetailerRef, NOT_AVAILABLE};
use crate::error::Result;

#[derive(Debug, Default, Deserialize)]
pub struct RawLineItem {
    name: Option<Text>,
    #[serde(rename = "Product_name")]
    product_name_title: Option<Text>,
    product_name: Option<Text>,
    item_name: Option<Text>,
    description: Option<Text>,

    #[serde(rename = "Product")]
    product_title: Option<Text>,
    product: Option<Text>,

    hsn_code: Option<Text>,
    hsn: Option<Text>,
    #[serde(rename = "hsnCode")]
    hsn_code_camel: Option<Text>,

    quantity: Option<Amount>,
    qty: Option<Amount>,

    price: Option<Amount>,
    rate: Option<Amount>,
    unit_price: Option<Amount>,

    taxable_value: Option<Amount>,
    taxable: Option<Amount>,
    gst_rate: Option<Amount>,
    gst: Option<Amount>,
    cgst: Option<Amount>,
    sgst: Option<Amount>,
    igst: Option<Amount>,
}

impl RawLineItem {
    pub fn normalize(&self) -> LineItem {
        LineItem {
            quantity: first_amount(&[self.quantity, self.qty]),
            unit_price: first_amount(&[self.price, self.rate, self.unit_price]),
            taxable_value: first_amount(&[self.taxable_value, self.taxable]),
            gst_rate_percent: first_amount(&[self.gst_rate, self.gst]),
            cgst: first_amount(&[self.cgst]),
            sgst: first_amount(&[self.sgst]),
            igst: first_amount(&[self.igst]),
            product_identifier: first_text(&[&self.product_title, &self.product])
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            product_name: first_text(&[
                &self.name,
                &self.product_name_title,
                &self.product_name,
                &self.item_name,
                &self.description,
            ]),
            hsn_code: first_text(&[&self.hsn_code, &self.hsn, &self.hsn_code_camel])
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawRetailer {
    name: Option<Text>,
    address_line1: Option<Text>,
    address_line2: Option<Text>,
    city: Option<Text>,
    pincode: Option<Text>,
    state: Option<Text>,
    country: Option<Text>,
    gstin: Option<Text>,
    email: Option<Text>,
    contact: Option<Text>,
}

impl RawRetailer {
    fn normalize(&self) -> Retailer {
        Retailer {
            name: text(&self.name),
            address_line1: text(&self.address_line1),
            address_line2: text(&self.address_line2),
            city: text(&self.city),
            pincode: text(&self.pincode),
            state: text(&self.state),
            country: text(&self.country),
            gstin: text(&self.gstin),
            email: text(&self.email),
            contact: text(&self.contact),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawCompany {
    name: Option<Text>,
    address: Option<Text>,
    city: Option<Text>,
    state: Option<Text>,
    country: Option<Text>,
    pincode: Option<Text>,
    gstin: Option<Text>,
    email: Option<Text>,
    phone: Option<Text>,
}

impl RawCompany {
    fn normalize(&self) -> Company {
        Company {
            name: text(&self.name),
            address: text(&self.address),
            city: text(&self.city),
            state: text(&self.state),
            country: text(&self.country),
            pincode: text(&self.pincode),
            gstin: text(&self.gstin),
            email: text(&self.email),
            phone: text(&self.phone),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawBill {
    invoice_number: Option<Text>,
    #[serde(rename = "Retailer")]
    retailer_title: Option<Value>,
    retailer: Option<Value>,
    retailer_name: Option<Text>,
    company: Option<Value>,
    invoice_date: Option<Text>,
    payment_mode: Option<Text>,
    payment_status: Option<Text>,
    items: Option<Value>,
    total_taxable_value: Option<Amount>,
    total_cgst: Option<Amount>,
    total_sgst: Option<Amount>,
    total_igst: Option<Amount>,
    grand_total: Option<Amount>,
}

impl RawBill {
    pub fn normalize(&self) -> Invoice {
        let retailer = [&self.retailer_title, &self.retailer]
            .into_iter()
            .flatten()
            .find_map(retailer_ref);

        let company = self
            .company
            .as_ref()
            .filter(|v| v.is_object())
            .and_then(|v| serde_json::from_value::<RawCompany>(v.clone()).ok())
            .map(|c| c.normalize());

        Invoice {
            invoice_number: text(&self.invoice_number),
            retailer,
            retailer_name: text(&self.retailer_name),
            company,
            invoice_date: text(&self.invoice_date),
            payment_mode: text(&self.payment_mode),
            payment_status: text(&self.payment_status),
            items: self.items.as_ref().map(normalize_items).unwrap_or_default(),
            reported: ReportedTotals {
                taxable: reported(self.total_taxable_value),
                cgst: reported(self.total_cgst),
                sgst: reported(self.total_sgst),
                igst: reported(self.total_igst),
                grand_total: reported(self.grand_total),
            },
        }
    }
}

/// Parse a bills payload: a bare array or a `{"results": [...]}` envelope.
///
/// Records that are not bill objects are skipped; any other payload shape
/// yields no bills. Only malformed JSON is an error.
pub fn parse_payload(body: &str) -> Result<Vec<Invoice>> {
    let value: Value = serde_json::from_str(body)?;

    let records = match value {
        Value::Array(records) => records,
        Value::Object(mut envelope) => match envelope.remove("results") {
            Some(Value::Array(records)) => records,
            _ => {
                warn!("bills payload has no results array");
                Vec::new()
            }
        },
        other => {
            warn!(kind = json_kind(&other), "unexpected bills payload");
            Vec::new()
        }
    };

    let bills: Vec<Invoice> = records
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| match serde_json::from_value::<RawBill>(record) {
            Ok(raw) => Some(raw.normalize()),
            Err(e) => {
                warn!(index = idx, error = %e, "skipping unreadable bill record");
                None
            }
        })
        .collect();

    debug!(count = bills.len(), "normalized bills");
    Ok(bills)
}

fn normalize_items(value: &Value) -> Vec<LineItem> {
    let Value::Array(items) = value else {
        warn!(kind = json_kind(value), "bill items is not an array");
        return Vec::new();
    };

    // Unreadable entries keep their slot so later lines keep their position
    items
        .iter()
        .map(|item| {
            serde_json::from_value::<RawLineItem>(item.clone())
                .map(|raw| raw.normalize())
                .unwrap_or_default()
        })
        .collect()
}

fn retailer_ref(value: &Value) -> Option<RetailerRef> {
    match value {
        Value::Object(_) => serde_json::from_value::<RawRetailer>(value.clone())
            .ok()
            .map(|r| RetailerRef::Record(r.normalize())),
        Value::String(name) if !name.trim().is_empty() => Some(RetailerRef::Name(name.clone())),
        _ => None,
    }
}

/// First alias holding a non-zero number, else zero
fn first_amount(candidates: &[Option<Amount>]) -> f64 {
    candidates
        .iter()
        .flatten()
        .map(|a| a.value())
        .find(|v| *v != 0.0)
        .unwrap_or(0.0)
}

fn first_text(candidates: &[&Option<Text>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|t| t.as_ref().and_then(Text::non_blank))
        .map(str::to_string)
        .next()
}

fn text(value: &Option<Text>) -> Option<String> {
    value.as_ref().and_then(Text::non_blank).map(str::to_string)
}

fn reported(value: Option<Amount>) -> Option<f64> {
    value.and_then(Amount::parsed)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
