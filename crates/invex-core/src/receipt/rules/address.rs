//! Vendor address extraction.

use super::patterns::{
    AMOUNT_PATTERN, DATE_DMY, DATE_YMD, EMAIL, FIELD_LABEL_LINE, PHONE, POSTAL_CODE, STREET_WORD,
};
use super::vendor::VendorExtractor;
use super::{FieldCandidate, FieldExtractor};
use crate::models::config::ExtractionConfig;

/// Address extractor.
///
/// The address block opens at the first street or postal line after the
/// vendor name and runs until a blank line, a label line or a line with an
/// amount or date.
pub struct AddressExtractor {
    vendor: VendorExtractor,
    max_lines: usize,
    scan_lines: usize,
}

impl AddressExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            vendor: VendorExtractor::from_config(config),
            max_lines: config.max_address_lines,
            scan_lines: config.vendor_scan_lines + config.max_address_lines,
        }
    }

    /// Set the maximum number of joined lines.
    pub fn with_max_lines(mut self, lines: usize) -> Self {
        self.max_lines = lines;
        self
    }
}

impl Default for AddressExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AddressExtractor {
    type Output = String;

    fn extract_all(&self, text: &str) -> Vec<FieldCandidate<String>> {
        let first = self.vendor.locate(text).map_or(0, |i| i + 1);
        let lines: Vec<&str> = text.lines().map(str::trim).collect();

        let Some(open) = (first..lines.len().min(self.scan_lines)).find(|&i| opens_address(lines[i]))
        else {
            return Vec::new();
        };

        let mut parts = vec![lines[open]];
        for line in lines.iter().skip(open + 1) {
            if parts.len() >= self.max_lines || ends_address(line) {
                break;
            }
            parts.push(line);
        }

        let address = parts
            .iter()
            .map(|p| p.trim_end_matches(|c: char| c == ',' || c.is_whitespace()))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let confidence = if parts.iter().any(|p| POSTAL_CODE.is_match(p)) { 0.9 } else { 0.7 };
        vec![FieldCandidate::new(address, confidence, parts.join("\n"))]
    }
}

fn opens_address(line: &str) -> bool {
    line.chars().any(char::is_alphabetic)
        && (STREET_WORD.is_match(line) || POSTAL_CODE.is_match(line))
        && !ends_address(line)
}

fn ends_address(line: &str) -> bool {
    line.is_empty()
        || FIELD_LABEL_LINE.is_match(line)
        || AMOUNT_PATTERN.is_match(line)
        || DATE_DMY.is_match(line)
        || DATE_YMD.is_match(line)
        || PHONE.is_match(line)
        || EMAIL.is_match(line)
}
