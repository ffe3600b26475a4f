//! Vendor (merchant) name extraction from the document header.

use super::patterns::FIELD_LABEL_LINE;
use super::{FieldCandidate, FieldExtractor};
use crate::models::config::ExtractionConfig;

/// Vendor name extractor.
///
/// Looks at the first lines of the document and prefers a line carrying a
/// company suffix such as `SDN BHD` or `LTD`.
pub struct VendorExtractor {
    scan_lines: usize,
    stoplist: Vec<String>,
    company_suffixes: Vec<String>,
}

impl VendorExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            scan_lines: config.vendor_scan_lines,
            stoplist: config.vendor_stoplist.iter().map(|s| s.to_lowercase()).collect(),
            company_suffixes: config
                .company_suffixes
                .iter()
                .map(|s| s.to_uppercase())
                .collect(),
        }
    }

    /// Set the number of leading lines to scan.
    pub fn with_scan_lines(mut self, lines: usize) -> Self {
        self.scan_lines = lines;
        self
    }

    /// Whether the line contains one of the company suffixes as whole words.
    pub fn has_company_suffix(&self, line: &str) -> bool {
        let upper = line.to_uppercase();
        self.company_suffixes
            .iter()
            .any(|suffix| contains_word(&upper, suffix))
    }

    fn is_candidate_line(&self, line: &str) -> bool {
        let letters = line.chars().filter(|c| c.is_alphabetic()).count();
        let digits = line.chars().filter(|c| c.is_ascii_digit()).count();

        if line.chars().filter(|c| !c.is_whitespace()).count() < 3 || letters == 0 {
            return false;
        }
        if digits > letters {
            return false;
        }

        let bare = line
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if self.stoplist.iter().any(|s| *s == bare) {
            return false;
        }

        !FIELD_LABEL_LINE.is_match(line)
    }

    /// Index (among `text.lines()`) of the line chosen as vendor.
    pub fn locate(&self, text: &str) -> Option<usize> {
        let (start, _) = self.extract(text)?.position?;
        Some(text[..start].matches('\n').count())
    }
}

impl Default for VendorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for VendorExtractor {
    type Output = String;

    fn extract_all(&self, text: &str) -> Vec<FieldCandidate<String>> {
        let mut results = Vec::new();
        let mut offset = 0;

        for (index, raw_line) in text.split('\n').enumerate() {
            let line_start = offset;
            offset += raw_line.len() + 1;

            if index >= self.scan_lines {
                break;
            }

            let line = raw_line.trim();
            if !self.is_candidate_line(line) {
                continue;
            }

            let confidence = if self.has_company_suffix(line) { 1.0 } else { 0.6 };
            let start = line_start + (raw_line.len() - raw_line.trim_start().len());
            results.push(
                FieldCandidate::new(line.to_string(), confidence, line)
                    .with_position(start, start + line.len()),
            );
        }

        results
    }

    /// The first suffix-bearing line, else the first plausible line.
    fn extract(&self, text: &str) -> Option<FieldCandidate<String>> {
        let candidates = self.extract_all(text);
        let preferred = candidates.iter().position(|c| c.confidence >= 1.0);

        match preferred {
            Some(index) => candidates.into_iter().nth(index),
            None => candidates.into_iter().next(),
        }
    }
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }

    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
