//! End-to-end checks on generated files.

use std::io::{Cursor, Read};
use std::path::PathBuf;

use kaushalya_core::{CustomerRecord, OrderRecord};
use kaushalya_docs::{build_workbook, write_export, write_invoice, ExportKind};
use serde_json::{json, Value};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kaushalya-docs-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn orders() -> Vec<OrderRecord> {
    serde_json::from_value(json!([
        {
            "id": 1,
            "orderId": "ORD-001",
            "firstName": "Asha",
            "items": [{ "name": "Silver Jhumka", "quantity": 2, "price": 500, "total": 1000 }],
            "total": 1100,
            "orderStatus": "Pending",
            "couponCode": "FESTIVE10"
        },
        { "id": 2, "orderId": "ORD-002", "total": 450.5 }
    ]))
    .unwrap()
}

fn sheet_xml(workbook: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(workbook)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

/// Inline-string texts of row `number`, in column order.
fn row_texts(xml: &str, number: usize) -> Vec<String> {
    let open = format!(r#"<row r="{number}">"#);
    let start = xml.find(&open).expect("row present") + open.len();
    let row = &xml[start..start + xml[start..].find("</row>").expect("row closed")];
    row.split("<t>")
        .skip(1)
        .filter_map(|part| part.split_once("</t>").map(|(text, _)| text.to_owned()))
        .collect()
}

#[test]
fn export_is_byte_for_byte_idempotent() {
    let records = orders();
    let first = build_workbook(&records, "Orders").unwrap();
    let second = build_workbook(&records, "Orders").unwrap();
    assert_eq!(first, second);
}

#[test]
fn export_sheet_has_header_and_one_row_per_record() {
    let xml = sheet_xml(&build_workbook(&orders(), "Orders").unwrap());
    assert!(xml.contains(r#"<row r="1">"#));
    assert!(xml.contains(r#"<row r="3">"#));
    assert!(!xml.contains(r#"<row r="4">"#));
    assert!(xml.contains("<t>orderId</t>"));
    assert!(xml.contains("<t>couponCode</t>"));
    assert!(xml.contains("<t>ORD-002</t>"));
    assert!(xml.contains("<v>450.5</v>"));
}

#[test]
fn backend_records_export_with_their_own_columns() {
    let records: Vec<Value> = serde_json::from_value(json!([
        { "_id": "abc", "orderId": "ORD-1", "total": "1100", "paymentMethod": null },
        { "orderId": "ORD-2", "giftWrap": true }
    ]))
    .unwrap();

    let xml = sheet_xml(&build_workbook(&records, "Orders").unwrap());
    assert_eq!(
        row_texts(&xml, 1),
        vec!["_id", "orderId", "total", "paymentMethod", "giftWrap"]
    );
    assert_eq!(row_texts(&xml, 2), vec!["abc", "ORD-1", "1100"]);
    assert!(!xml.contains("<v>1100</v>"));
    assert!(!xml.contains(r#"r="D2""#));
    assert!(xml.contains(r#"<c r="E3" t="b"><v>1</v></c>"#));
}

#[test]
fn workbook_names_the_sheet() {
    let bytes = build_workbook(&orders(), "Orders").unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let mut xml = String::new();
    archive
        .by_name("xl/workbook.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    assert!(xml.contains(r#"name="Orders""#));
}

#[test]
fn customer_export_lands_in_users_report() {
    let dir = temp_dir("customers");
    let customers: Vec<CustomerRecord> = serde_json::from_value(json!([
        { "id": 7, "firstName": "Meera", "lastName": "Shah", "email": "meera@example.com" }
    ]))
    .unwrap();

    let path = write_export(&customers, ExportKind::Customers, &dir).unwrap();
    assert_eq!(path, dir.join("users_report.xlsx"));
    let xml = sheet_xml(&std::fs::read(&path).unwrap());
    assert!(xml.contains("<t>meera@example.com</t>"));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn empty_export_still_writes_a_workbook() {
    let dir = temp_dir("empty");
    let path = write_export::<OrderRecord>(&[], ExportKind::Orders, &dir).unwrap();
    assert_eq!(path.file_name().unwrap(), "orders_report.xlsx");
    let xml = sheet_xml(&std::fs::read(&path).unwrap());
    assert!(xml.contains(r#"<row r="1">"#));
    assert!(!xml.contains(r#"<row r="2">"#));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn invoice_is_written_under_its_order_id() {
    let dir = temp_dir("invoice");
    let order = orders().remove(0);

    let path = write_invoice(&order, &dir).unwrap();
    assert_eq!(path, dir.join("Invoice_ORD-001.pdf"));
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    let again = write_invoice(&order, &dir).unwrap();
    assert_eq!(std::fs::read(again).unwrap(), bytes);
    std::fs::remove_dir_all(&dir).unwrap();
}
