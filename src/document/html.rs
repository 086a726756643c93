use crate::display::{format_amount, format_invoice_date, or_na, resolve_retailer_display_name};
use crate::model::{Company, Invoice, Retailer};
use crate::reconcile::{reconcile_invoice_totals_with, reconcile_lines, LineItemComputed};

use super::{DocumentKind, DocumentSettings};

/// Page shell shared by printed and downloaded bills
const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8" />
<title>{{TITLE}}</title>
<style>
  body { background: #1E40AF; color: white; margin: 0; padding: 24px; font-family: Arial, sans-serif; }
  table, tr, th, td { border: 1px solid white; color: white; border-collapse: collapse; }
  th { background: #1E90FF; }
  th, td { padding: 6px 8px; }
  .items { width: 100%; font-size: 14px; margin-bottom: 8px; }
  .header, .parties, .footer { display: flex; justify-content: space-between; gap: 32px; margin-bottom: 16px; }
  .company-name { font-size: 20px; font-weight: bold; }
  .title { font-size: 30px; font-weight: bold; color: #93C5FD; }
  .small { font-size: 13px; }
  .label { font-weight: bold; }
  .details { text-align: right; }
  .totals { max-width: 420px; margin-top: 16px; }
  .totals .row { display: flex; justify-content: space-between; }
  .totals .grand { font-size: 18px; font-weight: bold; border-top: 1px solid white; margin-top: 8px; padding-top: 8px; }
  .estimate { color: #FDE047; }
  .note { font-size: 12px; }
  .signature { width: 160px; height: 48px; border-bottom: 1px solid #9CA3AF; }
  * { -webkit-print-color-adjust: exact; print-color-adjust: exact; }
</style>
</head>
<body>
{{BODY}}
{{SCRIPT}}
</body>
</html>
"##;

const PRINT_SCRIPT: &str = r#"<script>
  window.addEventListener("load", function () {
    setTimeout(function () { window.focus(); window.print(); }, 300);
  });
</script>"#;

const ESTIMATE_NOTE: &str =
    "* Estimated figures: the source bill reported a quantity but no pricing for these lines.";

/// Render a bill as a standalone HTML page
pub fn render_document(bill: &Invoice, kind: DocumentKind, settings: &DocumentSettings) -> String {
    let title = escape_html(bill.invoice_number.as_deref().unwrap_or("Invoice"));
    let script = match kind {
        DocumentKind::Print => PRINT_SCRIPT,
        DocumentKind::Download => "",
    };

    PAGE_TEMPLATE
        .replace("{{TITLE}}", &title)
        .replace("{{SCRIPT}}", script)
        .replace("{{BODY}}", &render_body(bill, settings))
}

fn render_body(bill: &Invoice, settings: &DocumentSettings) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"invoice\">\n");

    // Company and heading
    out.push_str("<div class=\"header\">\n<div>\n");
    out.push_str(&company_block(bill.company.as_ref()));
    out.push_str("</div>\n<div class=\"title\">INVOICE</div>\n</div>\n");

    // Billed to and bill details
    out.push_str("<div class=\"parties\">\n<div>\n<div class=\"label\">Billed To:</div>\n");
    let retailer_name =
        resolve_retailer_display_name(bill.retailer.as_ref(), bill.retailer_name.as_deref());
    out.push_str(&format!("<div>{}</div>\n", escape_html(&retailer_name)));
    if let Some(record) = bill.retailer_record() {
        out.push_str(&retailer_lines(record));
    }
    out.push_str("</div>\n<div class=\"details\">\n");
    let date = match bill.invoice_date.as_deref() {
        Some(raw) => format_invoice_date(Some(raw)),
        None => "Not specified".to_string(),
    };
    for (label, value) in [
        ("Invoice No", or_na(bill.invoice_number.as_deref()).to_string()),
        ("Date", date),
        ("Payment Mode", or_na(bill.payment_mode.as_deref()).to_string()),
        ("Payment Status", or_na(bill.payment_status.as_deref()).to_string()),
    ] {
        out.push_str(&format!(
            "<div><span class=\"label\">{}:</span> {}</div>\n",
            label,
            escape_html(&value)
        ));
    }
    out.push_str("</div>\n</div>\n");

    let lines = reconcile_lines(bill, &settings.options);
    out.push_str(&items_table(bill, &lines, &settings.currency_symbol));

    let totals = reconcile_invoice_totals_with(bill, &settings.options);
    let symbol = escape_html(&settings.currency_symbol);
    out.push_str("<div class=\"totals\">\n");
    for (label, value) in [
        ("Total Taxable Value", totals.total_taxable),
        ("Total CGST", totals.total_cgst),
        ("Total SGST", totals.total_sgst),
        ("Total IGST", totals.total_igst),
    ] {
        out.push_str(&format!(
            "<div class=\"row\"><span class=\"label\">{}:</span><span>{}{}</span></div>\n",
            label,
            symbol,
            format_amount(value)
        ));
    }
    out.push_str(&format!(
        "<div class=\"row grand\"><span>Grand Total:</span><span>{}{}</span></div>\n",
        symbol,
        format_amount(totals.grand_total)
    ));
    if totals.includes_estimates() {
        out.push_str(&format!(
            "<div class=\"note estimate\">{}</div>\n",
            escape_html(ESTIMATE_NOTE)
        ));
    }
    out.push_str("</div>\n");

    out.push_str(concat!(
        "<div class=\"footer\">\n",
        "<div><div class=\"label\">Note:</div><div class=\"small\">Thank you for your business!</div></div>\n",
        "<div class=\"details\"><div class=\"label\">Authorized Signature</div><div class=\"signature\"></div></div>\n",
        "</div>\n",
    ));

    out.push_str("</div>");
    out
}

fn company_block(company: Option<&Company>) -> String {
    let default = Company::default();
    let company = company.unwrap_or(&default);

    let mut out = format!(
        "<div class=\"company-name\">{}</div>\n<div class=\"small\">{}</div>\n",
        escape_html(company.name.as_deref().unwrap_or("Company Name")),
        escape_html(company.address.as_deref().unwrap_or("Company Address")),
    );
    for (label, value) in [
        ("City", &company.city),
        ("State", &company.state),
        ("Country", &company.country),
        ("Pincode", &company.pincode),
        ("GSTIN", &company.gstin),
        ("Email", &company.email),
        ("Phone", &company.phone),
    ] {
        if let Some(value) = value {
            out.push_str(&format!(
                "<div class=\"small\">{}: {}</div>\n",
                label,
                escape_html(value)
            ));
        }
    }
    out
}

fn retailer_lines(record: &Retailer) -> String {
    let mut out = String::new();
    for value in [&record.address_line1, &record.address_line2].into_iter().flatten() {
        out.push_str(&format!("<div class=\"small\">{}</div>\n", escape_html(value)));
    }
    for (label, value) in [
        ("City", &record.city),
        ("Pincode", &record.pincode),
        ("State", &record.state),
        ("Country", &record.country),
        ("GSTIN", &record.gstin),
        ("Email", &record.email),
        ("Contact", &record.contact),
    ] {
        if let Some(value) = value {
            out.push_str(&format!(
                "<div class=\"small\">{}: {}</div>\n",
                label,
                escape_html(value)
            ));
        }
    }
    out
}

fn items_table(bill: &Invoice, lines: &[LineItemComputed], currency_symbol: &str) -> String {
    let symbol = escape_html(currency_symbol);
    let mut out = String::from(concat!(
        "<table class=\"items\">\n<thead>\n<tr>",
        "<th>#</th><th>Product</th><th>HSN</th><th>Qty</th><th>Rate</th><th>Taxable</th>",
        "<th>GST %</th><th>CGST</th><th>SGST</th><th>IGST</th><th>Total</th>",
        "</tr>\n</thead>\n<tbody>\n",
    ));

    if bill.items.is_empty() {
        out.push_str("<tr><td colspan=\"11\">No items found in this bill</td></tr>\n");
    }

    for (idx, (item, line)) in bill.items.iter().zip(lines).enumerate() {
        let (row_class, marker) = if line.is_estimated() {
            (" class=\"estimate\"", " *")
        } else {
            ("", "")
        };

        let mut product = format!("Product ID: {}", escape_html(&item.product_identifier));
        if let Some(name) = &item.product_name {
            product.push_str(&format!("<div class=\"small\">{}</div>", escape_html(name)));
        }

        out.push_str(&format!(
            "<tr{}><td>{}{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{s}{}</td><td>{s}{}</td><td>{}%</td><td>{s}{}</td><td>{s}{}</td><td>{s}{}</td><td>{s}{}</td></tr>\n",
            row_class,
            idx + 1,
            marker,
            product,
            escape_html(&item.hsn_code),
            item.quantity,
            format_amount(line.unit_price),
            format_amount(line.taxable_value),
            line.gst_rate_percent,
            format_amount(line.cgst),
            format_amount(line.sgst),
            format_amount(line.igst),
            format_amount(line.line_total),
            s = symbol,
        ));
    }

    out.push_str("</tbody>\n</table>\n");
    out
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("₹1,000 plain"), "₹1,000 plain");
    }
}
