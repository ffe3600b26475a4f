//! End-to-end extraction over OCR text and documents.

use invex_core::receipt::TextNormalizer;
use invex_core::{ExtractionResult, InvexConfig, OcrDocument, ReceiptExtractor, ReceiptParser};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::{json, Value};

const OJC_RECEIPT: &str = "OJC MARKETING SDN BHD\nNO JALAN BAYU 4, BANDAR SERI ALAM, 81750 MASAI, JOHOR\nDATE: 15/01/2019\nRECEIPT NO: PEGIV-1030765\nTOTAL: 193.00";

const FULL_RECEIPT: &str = "\
OJC MARKETING SDN BHD
ROC NO: 538358-H
NO 2 & 4, JALAN BAYU 4,
BANDAR SERI ALAM,
81750 MASAI, JOHOR
TEL:07-388 2218 FAX:07-388 8218
EMAIL: ng@ojcgroup.com

TAX INVOICE
INVOICE NO: PEGIV-1030765
DATE: 15/01/2019 11:05:16 AM
CASHIER: NG CHUI
BILL TO: KEDAI RUNCIT AH SENG

DESCRIPTION QTY PRICE AMOUNT
KINGS SAFETY SHOES KWD 805
1 170.00 170.00
2 x SAFETY VEST 11.50 23.00
TOTAL QTY: 3
TOTAL INCLUSIVE GST: 193.00
CASH 200.00
CHANGE 7.00
GOODS SOLD ARE NOT RETURNABLE, THANK YOU";

fn parse(text: &str) -> ExtractionResult {
    ReceiptParser::default().parse(text)
}

#[test]
fn test_ojc_receipt_fields() {
    let result = parse(OJC_RECEIPT);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["vendor"], json!("OJC MARKETING SDN BHD"));
    assert_eq!(json["date"], json!("15/01/2019"));
    assert_eq!(json["receipt_number"], json!("PEGIV-1030765"));
    assert_eq!(json["total_amount"], json!(193.0));
    assert_eq!(json["validation_passed"], json!(true));
    assert_eq!(json["items"], json!([]));
}

#[test]
fn test_full_receipt() {
    let result = parse(FULL_RECEIPT);

    assert_eq!(result.vendor.as_deref(), Some("OJC MARKETING SDN BHD"));
    assert_eq!(
        result.address.as_deref(),
        Some("NO 2 & 4, JALAN BAYU 4, BANDAR SERI ALAM, 81750 MASAI, JOHOR")
    );
    assert_eq!(result.date.as_deref(), Some("15/01/2019"));
    assert_eq!(result.receipt_number.as_deref(), Some("PEGIV-1030765"));
    assert_eq!(
        result.bill_to.as_ref().map(|b| b.name.as_str()),
        Some("KEDAI RUNCIT AH SENG")
    );

    let items: Vec<(&str, u32)> = result
        .items
        .iter()
        .map(|i| (i.description.as_str(), i.quantity))
        .collect();
    assert_eq!(items, vec![("KINGS SAFETY SHOES KWD 805", 1), ("SAFETY VEST", 2)]);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["total_amount"], json!(193.0));
    assert!(result.validation_passed, "notes: {:?}", result.validation_notes);
}

#[test]
fn test_missing_date_lowers_confidence_only() {
    let without_date = OJC_RECEIPT.replace("DATE: 15/01/2019\n", "");
    let full = parse(OJC_RECEIPT);
    let result = parse(&without_date);

    assert_eq!(result.date, None);
    assert_eq!(result.vendor, full.vendor);
    assert_eq!(result.receipt_number, full.receipt_number);
    assert_eq!(result.total_amount, full.total_amount);
    assert!(result.extraction_confidence < full.extraction_confidence);
    assert!(result.extraction_confidence <= 100);
}

#[test]
fn test_labeled_total_beats_larger_amount() {
    let result = parse("TOTAL: 50.00\n120.00");
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["total_amount"], json!(50.0));
}

#[test]
fn test_empty_input() {
    let json = serde_json::to_value(parse("")).unwrap();

    assert_eq!(
        json,
        json!({
            "receipt_number": null,
            "date": null,
            "bill_to": null,
            "items": [],
            "total_amount": null,
            "extraction_confidence": 0,
            "validation_passed": false,
            "vendor": null,
            "address": null
        })
    );
}

#[test]
fn test_unobserved_total_fails_validation() {
    let result = parse("ACME SDN BHD\nTOTAL: 193");

    assert_eq!(result.total_amount, Some(193.into()));
    assert!(!result.validation_passed);
    assert!(!result.validation_notes.is_empty());
}

#[test]
fn test_oversized_line_items_fail_validation() {
    let result = parse(
        "DESCRIPTION QTY\nAAA 70000000000000000000000000000.00\nBBB 70000000000000000000000000000.00\nTOTAL 1.00",
    );

    assert_eq!(result.items.len(), 2);
    assert_eq!(result.total_amount, Some(Decimal::new(100, 2)));
    assert!(!result.validation_passed);
}

#[test]
fn test_total_sales_label_beats_cash_tendered() {
    let result = parse("ABC TRADING\nTOTAL SALES (INCLUSIVE GST) 193.00\nCASH 200.00\nCHANGE 7.00");

    assert_eq!(result.total_amount, Some(Decimal::new(19300, 2)));
    assert!(result.validation_passed, "notes: {:?}", result.validation_notes);
}

#[test]
fn test_garbage_input_is_well_formed() {
    let inputs = [
        "@@@@ ####",
        "\u{0}\u{1}",
        "12345",
        "TOTAL",
        "\n\n\n",
        "TOTAL: 99999999999999999999999999999999999999.00",
        "GRAND TOTAL 79228162514264337593543950335.00\nCASH 79228162514264337593543950335.00",
        "ACME SDN BHD\nWIDGET 4000000000 99999999999999999999999999.00 5.00\nTOTAL: 5.00",
        "DESCRIPTION QTY\nAAA 70000000000000000000000000000.00\nBBB 70000000000000000000000000000.00\nTOTAL 1.00",
        "ITEM QTY AMOUNT\n9999 x WIDGET 79228162514264337593543950335.00\nTOTAL 1.00",
        "DATE: 99/99/99999\nTOTAL: 0.00",
    ];

    for text in inputs {
        let json: Value = serde_json::to_value(parse(text)).unwrap();
        let confidence = json["extraction_confidence"].as_u64().unwrap();

        assert!(confidence <= 100);
        assert!(json["items"].is_array());
        assert!(json.get("vendor").is_some());
    }
}

#[test]
fn test_confidence_is_monotonic() {
    let steps = [
        "TOTAL: 193.00",
        "OJC MARKETING SDN BHD\nTOTAL: 193.00",
        "OJC MARKETING SDN BHD\nDATE: 15/01/2019\nTOTAL: 193.00",
        "OJC MARKETING SDN BHD\nDATE: 15/01/2019\nRECEIPT NO: PEGIV-1030765\nTOTAL: 193.00",
    ];

    let scores: Vec<u8> = steps.iter().map(|t| parse(t).extraction_confidence).collect();
    assert!(scores.windows(2).all(|w| w[0] <= w[1]), "scores: {scores:?}");
}

#[test]
fn test_normalizer_is_idempotent() {
    let normalizer = TextNormalizer::default();

    for text in [OJC_RECEIPT, FULL_RECEIPT, "  TOTAL  :\t1O.5O \r\n\r\n\r\nRM1S.0B  ", ""] {
        let once = normalizer.normalize(text);
        assert_eq!(normalizer.normalize(&once), once);
    }
}

#[test]
fn test_ocr_confusions_are_fixed_before_extraction() {
    let result = parse("ACME SDN BHD\nTOTAL: 1O.5O");
    assert_eq!(result.total_amount, Some(rust_decimal::Decimal::new(1050, 2)));
    assert!(result.validation_passed);
}

#[test]
fn test_month_first_configuration() {
    let mut config = InvexConfig::default();
    config.extraction.day_first = false;

    let result = ReceiptParser::new(config).parse("DATE: 03/04/2020\nTOTAL: 5.00");
    assert_eq!(result.date.as_deref(), Some("04/03/2020"));
}

#[test]
fn test_json_document_input() {
    let json = r#"{
        "tokens": [
            {"text": "ACME", "bbox": [10, 10, 50, 10, 50, 30, 10, 30], "confidence": 0.98},
            {"text": "SDN", "bbox": [55, 10, 80, 10, 80, 30, 55, 30], "confidence": 0.97},
            {"text": "BHD", "bbox": [85, 10, 110, 10, 110, 30, 85, 30], "confidence": 0.97},
            {"text": "TOTAL:", "bbox": [10, 100, 60, 100, 60, 120, 10, 120], "confidence": 0.95},
            {"text": "RM12.50", "bbox": [70, 101, 120, 101, 120, 121, 70, 121], "confidence": 0.95}
        ],
        "image_size": [200, 300]
    }"#;

    let document = OcrDocument::from_json(json).unwrap();
    let result = ReceiptParser::default().extract(&document);

    assert_eq!(result.vendor.as_deref(), Some("ACME SDN BHD"));
    assert_eq!(result.total_amount, Some(rust_decimal::Decimal::new(1250, 2)));
}

#[test]
fn test_tesseract_input() {
    let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
               1\t1\t0\t0\t0\t0\t0\t0\t400\t300\t-1\t\n\
               5\t1\t1\t1\t1\t1\t10\t10\t40\t20\t96.5\tACME\n\
               5\t1\t1\t1\t1\t2\t55\t10\t30\t20\t95.0\tSDN\n\
               5\t1\t1\t1\t1\t3\t90\t10\t30\t20\t95.0\tBHD\n\
               5\t1\t2\t1\t1\t1\t10\t100\t50\t20\t91.0\tTOTAL:\n\
               5\t1\t2\t1\t1\t2\t70\t100\t50\t20\t90.0\t8.80\n";

    let document = OcrDocument::from_tesseract_tsv(tsv).unwrap();
    let result = ReceiptParser::default().extract(&document);

    assert_eq!(result.vendor.as_deref(), Some("ACME SDN BHD"));
    assert_eq!(result.total_amount, Some(rust_decimal::Decimal::new(880, 2)));
    assert!(result.validation_passed);
}
