use vendor_bills::model::{parse_payload, RetailerRef, NOT_AVAILABLE};
use vendor_bills::{resolve_retailer_display_name, BillsError};

#[test]
fn envelope_and_bare_array_are_equivalent() {
    let bare = parse_payload(r#"[{"invoice_number": "X-1"}]"#).unwrap();
    let wrapped = parse_payload(r#"{"results": [{"invoice_number": "X-1"}]}"#).unwrap();
    assert_eq!(bare, wrapped);
    assert_eq!(bare[0].invoice_number.as_deref(), Some("X-1"));
}

#[test]
fn unexpected_shapes_yield_no_bills() {
    assert!(parse_payload(r#"{"detail": "Not found"}"#).unwrap().is_empty());
    assert!(parse_payload(r#"{"results": null}"#).unwrap().is_empty());
    assert!(parse_payload("42").unwrap().is_empty());
}

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(parse_payload("[{"), Err(BillsError::Payload(_))));
}

#[test]
fn non_object_records_are_skipped() {
    let bills = parse_payload(r#"[null, 7, {"invoice_number": "B"}]"#).unwrap();
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].invoice_number.as_deref(), Some("B"));
}

#[test]
fn item_aliases_map_to_canonical_fields() {
    let bills = parse_payload(
        r#"[{"items": [
            {"Product_name": "Steel Rod", "Product": 9, "hsn": "7214", "qty": "3",
             "rate": "120.50", "taxable": 361.5, "gst": "18", "cgst": 32.54, "sgst": 32.54},
            {"item_name": "Bolt", "product": "B-7", "hsnCode": 7318, "quantity": 10,
             "unit_price": 2, "taxable_value": "20", "gst_rate": 5, "igst": "1"}
        ]}]"#,
    )
    .unwrap();
    let items = &bills[0].items;

    assert_eq!(items[0].product_name.as_deref(), Some("Steel Rod"));
    assert_eq!(items[0].product_identifier, "9");
    assert_eq!(items[0].hsn_code, "7214");
    assert_eq!(items[0].quantity, 3.0);
    assert_eq!(items[0].unit_price, 120.5);
    assert_eq!(items[0].taxable_value, 361.5);
    assert_eq!(items[0].gst_rate_percent, 18.0);
    assert_eq!(items[0].cgst, 32.54);

    assert_eq!(items[1].product_name.as_deref(), Some("Bolt"));
    assert_eq!(items[1].product_identifier, "B-7");
    assert_eq!(items[1].hsn_code, "7318");
    assert_eq!(items[1].unit_price, 2.0);
    assert_eq!(items[1].igst, 1.0);
}

#[test]
fn first_non_zero_alias_wins() {
    let bills = parse_payload(r#"[{"items": [{"price": 0, "rate": "75", "unit_price": 80}]}]"#)
        .unwrap();
    assert_eq!(bills[0].items[0].unit_price, 75.0);
}

#[test]
fn missing_and_garbage_fields_default() {
    let bills = parse_payload(
        r#"[{"items": [{"quantity": "lots", "price": null, "cgst": {"v": 1}, "hsn_code": "  "}]}]"#,
    )
    .unwrap();
    let item = &bills[0].items[0];

    assert_eq!(item.quantity, 0.0);
    assert_eq!(item.unit_price, 0.0);
    assert_eq!(item.cgst, 0.0);
    assert_eq!(item.hsn_code, NOT_AVAILABLE);
    assert_eq!(item.product_identifier, NOT_AVAILABLE);
    assert_eq!(item.product_name, None);
}

#[test]
fn non_object_items_keep_their_slot() {
    let bills = parse_payload(r#"[{"items": [null, {"quantity": 2}]}]"#).unwrap();
    let items = &bills[0].items;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].quantity, 0.0);
    assert_eq!(items[1].quantity, 2.0);
}

#[test]
fn reported_totals_track_presence() {
    let bills = parse_payload(
        r#"[{"grand_total": "0.00", "total_cgst": null, "total_sgst": "n/a", "total_taxable_value": 10}]"#,
    )
    .unwrap();
    let reported = bills[0].reported;

    assert_eq!(reported.grand_total, Some(0.0));
    assert_eq!(reported.cgst, None);
    assert_eq!(reported.sgst, None);
    assert_eq!(reported.igst, None);
    assert_eq!(reported.taxable, Some(10.0));
}

#[test]
fn retailer_record_or_name() {
    let bills = parse_payload(
        r#"[
            {"Retailer": {"name": "Acme", "gstin": "29AAA"}, "retailer_name": "ignored"},
            {"Retailer": "Corner Shop"},
            {"retailer": {"city": "Pune"}, "retailer_name": "Fallback Traders"},
            {"Retailer": "   "},
            {"Retailer": 12}
        ]"#,
    )
    .unwrap();

    let names: Vec<String> = bills
        .iter()
        .map(|b| resolve_retailer_display_name(b.retailer.as_ref(), b.retailer_name.as_deref()))
        .collect();
    assert_eq!(
        names,
        vec![
            "Acme",
            "Corner Shop",
            "Fallback Traders",
            "Unknown Retailer",
            "Unknown Retailer"
        ]
    );

    assert_eq!(
        bills[0].retailer_record().and_then(|r| r.gstin.as_deref()),
        Some("29AAA")
    );
    assert!(matches!(bills[1].retailer, Some(RetailerRef::Name(_))));
    assert_eq!(bills[3].retailer, None);
}

#[test]
fn company_is_optional() {
    let bills = parse_payload(
        r#"[{"company": {"name": "Sharma Mfg", "pincode": 411001}}, {"company": "7"}]"#,
    )
    .unwrap();

    let company = bills[0].company.as_ref().unwrap();
    assert_eq!(company.name.as_deref(), Some("Sharma Mfg"));
    assert_eq!(company.pincode.as_deref(), Some("411001"));
    assert_eq!(bills[1].company, None);
}
