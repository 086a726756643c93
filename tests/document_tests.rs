use tempfile::TempDir;
use vendor_bills::document::{
    download_file_name, render_document, write_download, DocumentKind, DocumentSettings,
};
use vendor_bills::model::parse_payload;
use vendor_bills::{Invoice, ReconcileOptions};

fn settings() -> DocumentSettings {
    DocumentSettings {
        currency_symbol: "₹".to_string(),
        options: ReconcileOptions::default(),
    }
}

fn bill(json: &str) -> Invoice {
    parse_payload(json).unwrap().remove(0)
}

#[test]
fn print_page_triggers_print_dialog() {
    let bill = bill(r#"[{"invoice_number": "INV-9"}]"#);

    let print = render_document(&bill, DocumentKind::Print, &settings());
    let download = render_document(&bill, DocumentKind::Download, &settings());

    assert!(print.contains("window.print()"));
    assert!(!download.contains("window.print()"));
    assert!(download.contains("<title>INV-9</title>"));
}

#[test]
fn empty_bill_uses_placeholders() {
    let html = render_document(&Invoice::default(), DocumentKind::Download, &settings());

    assert!(html.contains("<title>Invoice</title>"));
    assert!(html.contains("Company Name"));
    assert!(html.contains("Company Address"));
    assert!(html.contains("Unknown Retailer"));
    assert!(html.contains("Not specified"));
    assert!(html.contains("No items found in this bill"));
    assert!(html.contains("Grand Total:</span><span>₹0.00"));
    assert!(!html.contains("Estimated figures"));
}

#[test]
fn estimated_rows_are_marked() {
    let bill = bill(r#"[{"items": [{"quantity": 5}, {"quantity": 1, "price": 10, "taxable_value": 10}]}]"#);
    let html = render_document(&bill, DocumentKind::Download, &settings());

    assert!(html.contains("<tr class=\"estimate\"><td>1 *</td>"));
    assert!(html.contains("<tr><td>2</td>"));
    assert!(html.contains("<td>18%</td>"));
    assert!(html.contains("<td>₹590.00</td>"));
    assert!(html.contains("Estimated figures"));
}

#[test]
fn text_is_escaped() {
    let bill = bill(
        r#"[{"invoice_number": "<b>1</b>", "retailer_name": "Tom & Jerry's",
             "items": [{"name": "<script>", "quantity": 1, "price": 1}]}]"#,
    );
    let html = render_document(&bill, DocumentKind::Download, &settings());

    assert!(html.contains("&lt;b&gt;1&lt;/b&gt;"));
    assert!(html.contains("Tom &amp; Jerry&#39;s"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<b>1</b>"));
}

#[test]
fn retailer_and_company_details_rendered() {
    let bill = bill(
        r#"[{"Retailer": {"name": "Acme", "address_line1": "4 MG Road", "gstin": "27AAA", "contact": "98200"},
             "company": {"name": "Sharma Mfg", "gstin": "29BBB", "phone": "080-1234"},
             "payment_mode": "NEFT", "invoice_date": "2025-01-31"}]"#,
    );
    let html = render_document(&bill, DocumentKind::Download, &settings());

    assert!(html.contains("<div class=\"small\">4 MG Road</div>"));
    assert!(html.contains("GSTIN: 27AAA"));
    assert!(html.contains("Contact: 98200"));
    assert!(html.contains("GSTIN: 29BBB"));
    assert!(html.contains("Phone: 080-1234"));
    assert!(html.contains("NEFT"));
    assert!(html.contains("31/01/2025"));
}

#[test]
fn download_file_names_are_safe() {
    let named = bill(r#"[{"invoice_number": "INV/2025 #7"}]"#);
    assert_eq!(download_file_name(&named), "INV_2025__7.html");
    assert_eq!(download_file_name(&Invoice::default()), "invoice.html");

    let dots = bill(r#"[{"invoice_number": ".."}]"#);
    assert_eq!(download_file_name(&dots), "invoice.html");
}

#[test]
fn download_written_to_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("nested");
    let bill = bill(r#"[{"invoice_number": "INV-3", "grand_total": 99}]"#);

    let path = write_download(&bill, &settings(), &out, None).unwrap();
    assert_eq!(path, out.join("INV-3.html"));

    let html = std::fs::read_to_string(path).unwrap();
    assert!(html.contains("₹99.00"));
}
