//! Structured receipt record produced by the extraction pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Final output record for one document.
///
/// Every field is independently optional and serialized as `null` when it
/// could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Receipt or invoice number.
    pub receipt_number: Option<String>,

    /// Document date, normalized to `DD/MM/YYYY`.
    pub date: Option<String>,

    /// Billed party.
    pub bill_to: Option<BillTo>,

    /// Line items, empty when no table was detected.
    pub items: Vec<LineItem>,

    /// Grand total.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_amount: Option<Decimal>,

    /// Heuristic extraction quality (0 - 100).
    ///
    /// This is a deterministic score derived from which fields resolved,
    /// not a calibrated probability.
    pub extraction_confidence: u8,

    /// Whether the cross-field consistency checks passed.
    pub validation_passed: bool,

    /// Vendor (merchant) name.
    pub vendor: Option<String>,

    /// Vendor address.
    pub address: Option<String>,

    /// Validator findings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_notes: Vec<String>,

    /// Normalized OCR text, kept for debugging when enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

/// Party the document is billed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillTo {
    pub name: String,
    pub email: Option<String>,
}

/// A single row of a receipt or invoice table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product/service description.
    pub description: String,

    /// Quantity (1 when not printed).
    pub quantity: u32,

    /// Price per unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// Line total.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl ExtractionResult {
    /// Result for a document with no usable text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Names of fields that are still unresolved.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.vendor.is_none() {
            missing.push("vendor");
        }
        if self.address.is_none() {
            missing.push("address");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if self.receipt_number.is_none() {
            missing.push("receipt_number");
        }
        if self.bill_to.is_none() {
            missing.push("bill_to");
        }
        if self.total_amount.is_none() {
            missing.push("total_amount");
        }
        if self.items.is_empty() {
            missing.push("items");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_empty_result_serializes_nulls() {
        let json = serde_json::to_value(ExtractionResult::empty()).unwrap();

        assert!(json["receipt_number"].is_null());
        assert!(json["date"].is_null());
        assert!(json["bill_to"].is_null());
        assert!(json["total_amount"].is_null());
        assert!(json["vendor"].is_null());
        assert!(json["address"].is_null());
        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["extraction_confidence"], 0);
        assert_eq!(json["validation_passed"], false);
        assert!(json.get("validation_notes").is_none());
        assert!(json.get("raw_text").is_none());
    }

    #[test]
    fn test_amounts_serialize_as_numbers() {
        let result = ExtractionResult {
            total_amount: Some(Decimal::from_str("193.00").unwrap()),
            items: vec![LineItem {
                description: "Nasi Lemak".to_string(),
                quantity: 2,
                unit_price: Decimal::from_str("4.50").unwrap(),
                total: Decimal::from_str("9.00").unwrap(),
            }],
            ..Default::default()
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total_amount"], serde_json::json!(193.0));
        assert_eq!(json["items"][0]["unit_price"], serde_json::json!(4.5));
        assert_eq!(json["items"][0]["quantity"], 2);
    }

    #[test]
    fn test_missing_fields() {
        let result = ExtractionResult {
            vendor: Some("OJC MARKETING SDN BHD".to_string()),
            ..Default::default()
        };
        let missing = result.missing_fields();
        assert!(!missing.contains(&"vendor"));
        assert!(missing.contains(&"date"));
        assert_eq!(missing.len(), 6);
    }
}
