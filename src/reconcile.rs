//! GST reconciliation for vendor bills.
//!
//! Per-line figures come straight from the backend unless a line reports a
//! quantity with no pricing at all, in which case placeholder figures are
//! estimated so the bill still reads as a bill. Invoice totals prefer the
//! backend's own totals field by field and fall back to the line sums.

use serde::{Deserialize, Serialize};

use crate::model::{Invoice, LineItem};

/// Flat rate used for estimated lines
pub const ESTIMATE_GST_RATE_PERCENT: f64 = 18.0;
/// Unit price of the first estimated line; each later position adds the step
pub const ESTIMATE_BASE_PRICE: f64 = 100.0;
pub const ESTIMATE_PRICE_STEP: f64 = 50.0;

/// How an authoritative total of exactly zero is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroTotalPolicy {
    /// Zero means the backend did not compute the total; use the line sums
    #[default]
    Missing,
    /// A zero the backend explicitly sent is kept
    Authoritative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReconcileOptions {
    #[serde(default = "default_estimate_missing")]
    pub estimate_missing: bool,
    #[serde(default)]
    pub zero_totals: ZeroTotalPolicy,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            estimate_missing: default_estimate_missing(),
            zero_totals: ZeroTotalPolicy::default(),
        }
    }
}

fn default_estimate_missing() -> bool {
    true
}

/// Where a line's figures came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    Reported,
    Estimated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineItemComputed {
    pub unit_price: f64,
    pub taxable_value: f64,
    pub gst_rate_percent: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub igst: f64,
    pub line_total: f64,
    pub basis: Basis,
}

impl LineItemComputed {
    pub fn is_estimated(&self) -> bool {
        self.basis == Basis::Estimated
    }
}

/// Where an invoice total came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalSource {
    Authoritative,
    #[default]
    Derived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TotalSources {
    pub taxable: TotalSource,
    pub cgst: TotalSource,
    pub sgst: TotalSource,
    pub igst: TotalSource,
    pub grand_total: TotalSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct InvoiceTotals {
    pub total_taxable: f64,
    pub total_cgst: f64,
    pub total_sgst: f64,
    pub total_igst: f64,
    pub grand_total: f64,
    pub sources: TotalSources,
    /// Lines whose figures were estimated
    pub estimated_lines: usize,
}

impl InvoiceTotals {
    /// True when any derived total includes estimated lines
    pub fn includes_estimates(&self) -> bool {
        if self.estimated_lines == 0 {
            return false;
        }
        let s = &self.sources;
        [s.taxable, s.cgst, s.sgst, s.igst, s.grand_total]
            .iter()
            .any(|source| *source == TotalSource::Derived)
    }

    /// True when the grand total itself was summed from estimated lines
    pub fn grand_total_estimated(&self) -> bool {
        self.estimated_lines > 0 && self.sources.grand_total == TotalSource::Derived
    }
}

/// A line with no unit price, taxable value or GST rate
fn is_data_empty(item: &LineItem) -> bool {
    item.unit_price == 0.0 && item.taxable_value == 0.0 && item.gst_rate_percent == 0.0
}

/// Reconcile one line with the default options
pub fn reconcile_line_item(item: &LineItem, index: usize) -> LineItemComputed {
    reconcile_line_item_with(item, index, &ReconcileOptions::default())
}

pub fn reconcile_line_item_with(
    item: &LineItem,
    index: usize,
    options: &ReconcileOptions,
) -> LineItemComputed {
    if options.estimate_missing && is_data_empty(item) && item.quantity > 0.0 {
        return estimate_line(item.quantity, index);
    }

    LineItemComputed {
        unit_price: item.unit_price,
        taxable_value: item.taxable_value,
        gst_rate_percent: item.gst_rate_percent,
        cgst: item.cgst,
        sgst: item.sgst,
        igst: item.igst,
        line_total: item.taxable_value + item.cgst + item.sgst + item.igst,
        basis: Basis::Reported,
    }
}

fn estimate_line(quantity: f64, index: usize) -> LineItemComputed {
    let unit_price = ESTIMATE_BASE_PRICE + index as f64 * ESTIMATE_PRICE_STEP;
    let taxable_value = quantity * unit_price;
    let gst_amount = taxable_value * ESTIMATE_GST_RATE_PERCENT / 100.0;
    let cgst = gst_amount / 2.0;
    let sgst = gst_amount / 2.0;

    LineItemComputed {
        unit_price,
        taxable_value,
        gst_rate_percent: ESTIMATE_GST_RATE_PERCENT,
        cgst,
        sgst,
        igst: 0.0,
        line_total: taxable_value + cgst + sgst,
        basis: Basis::Estimated,
    }
}

/// Reconcile every line of an invoice, in order
pub fn reconcile_lines(invoice: &Invoice, options: &ReconcileOptions) -> Vec<LineItemComputed> {
    invoice
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| reconcile_line_item_with(item, idx, options))
        .collect()
}

/// Reconcile invoice totals with the default options
pub fn reconcile_invoice_totals(invoice: &Invoice) -> InvoiceTotals {
    reconcile_invoice_totals_with(invoice, &ReconcileOptions::default())
}

pub fn reconcile_invoice_totals_with(
    invoice: &Invoice,
    options: &ReconcileOptions,
) -> InvoiceTotals {
    let mut derived = InvoiceTotals::default();
    for line in reconcile_lines(invoice, options) {
        derived.total_taxable += line.taxable_value;
        derived.total_cgst += line.cgst;
        derived.total_sgst += line.sgst;
        derived.total_igst += line.igst;
        derived.grand_total += line.line_total;
        if line.is_estimated() {
            derived.estimated_lines += 1;
        }
    }

    let reported = &invoice.reported;
    let policy = options.zero_totals;
    let (total_taxable, taxable) = pick(reported.taxable, derived.total_taxable, policy);
    let (total_cgst, cgst) = pick(reported.cgst, derived.total_cgst, policy);
    let (total_sgst, sgst) = pick(reported.sgst, derived.total_sgst, policy);
    let (total_igst, igst) = pick(reported.igst, derived.total_igst, policy);
    let (grand_total, grand) = pick(reported.grand_total, derived.grand_total, policy);

    InvoiceTotals {
        total_taxable,
        total_cgst,
        total_sgst,
        total_igst,
        grand_total,
        sources: TotalSources {
            taxable,
            cgst,
            sgst,
            igst,
            grand_total: grand,
        },
        estimated_lines: derived.estimated_lines,
    }
}

fn pick(reported: Option<f64>, derived: f64, policy: ZeroTotalPolicy) -> (f64, TotalSource) {
    match (reported, policy) {
        (Some(value), _) if value > 0.0 => (value, TotalSource::Authoritative),
        (Some(value), ZeroTotalPolicy::Authoritative) if value == 0.0 => {
            (value, TotalSource::Authoritative)
        }
        _ => (derived, TotalSource::Derived),
    }
}
