//! Receipt / invoice number extraction.

use super::patterns::RECEIPT_NUMBER;
use super::{FieldCandidate, FieldExtractor};

/// Receipt number extractor.
///
/// Only labeled numbers are reported (`Invoice No: ...`, `Receipt #...`).
pub struct ReceiptNumberExtractor;

impl ReceiptNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReceiptNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ReceiptNumberExtractor {
    type Output = String;

    fn extract_all(&self, text: &str) -> Vec<FieldCandidate<String>> {
        let mut results: Vec<FieldCandidate<String>> = Vec::new();

        for caps in RECEIPT_NUMBER.captures_iter(text) {
            let Some(m) = caps.get(1) else {
                continue;
            };

            let value = m.as_str().trim_end_matches(['-', '/']).to_uppercase();
            if value.len() < 3 || !value.chars().any(|c| c.is_ascii_digit()) {
                continue;
            }
            if results.iter().any(|r| r.value == value) {
                continue;
            }

            results.push(FieldCandidate::new(value, 0.95, m.as_str()).with_position(m.start(), m.end()));
        }

        results
    }
}
