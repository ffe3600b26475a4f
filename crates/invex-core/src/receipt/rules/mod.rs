//! Rule-based field extractors for receipts and invoices.

pub mod address;
pub mod amounts;
pub mod bill_to;
pub mod dates;
pub mod line_items;
pub mod patterns;
pub mod receipt_number;
pub mod vendor;

pub use address::AddressExtractor;
pub use amounts::{extract_amounts, parse_amount, AmountExtractor, TotalExtractor};
pub use bill_to::BillToExtractor;
pub use dates::{format_date, DateExtractor};
pub use line_items::LineItemExtractor;
pub use receipt_number::ReceiptNumberExtractor;
pub use vendor::VendorExtractor;

use regex::Regex;

/// Trait for field extractors.
///
/// Extractors never fail: text without a match yields no candidates.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract all candidates for the field, in document order.
    fn extract_all(&self, text: &str) -> Vec<FieldCandidate<Self::Output>>;

    /// Extract the first candidate.
    fn extract(&self, text: &str) -> Option<FieldCandidate<Self::Output>> {
        self.extract_all(text).into_iter().next()
    }
}

/// A tentative value for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCandidate<T> {
    /// Extracted value.
    pub value: T,
    /// Local confidence (0.0 - 1.0).
    pub confidence: f32,
    /// Byte span in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
    /// Bytes between the nearest preceding label and the match.
    pub label_distance: Option<usize>,
}

impl<T> FieldCandidate<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
            label_distance: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    pub fn with_label_distance(mut self, distance: Option<usize>) -> Self {
        self.label_distance = distance;
        self
    }

    /// Whether a label was found close before this candidate.
    pub fn is_labeled(&self) -> bool {
        self.label_distance.is_some()
    }

    /// Start offset, or `usize::MAX` for candidates without a position.
    pub fn start(&self) -> usize {
        self.position.map(|(s, _)| s).unwrap_or(usize::MAX)
    }
}

/// Byte spans of label matches accepted by `keep`.
pub(crate) fn label_spans(
    text: &str,
    pattern: &Regex,
    keep: impl Fn(&str, usize, usize) -> bool,
) -> Vec<(usize, usize)> {
    pattern
        .find_iter(text)
        .filter(|m| keep(text, m.start(), m.end()))
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Attach label distances to candidates sorted in document order.
///
/// Each label binds only the first candidate starting after it, and only
/// within `window` bytes, so a label never reaches past a competing value.
pub(crate) fn assign_label_distances<T>(
    candidates: &mut [FieldCandidate<T>],
    labels: &[(usize, usize)],
    window: usize,
) {
    for &(_, label_end) in labels {
        let Some(candidate) = candidates
            .iter_mut()
            .filter(|c| c.position.is_some())
            .find(|c| c.start() >= label_end)
        else {
            continue;
        };

        let distance = candidate.start() - label_end;
        if distance <= window {
            candidate.label_distance = Some(
                candidate
                    .label_distance
                    .map_or(distance, |d| d.min(distance)),
            );
        }
    }
}

/// The word following byte offset `end`, lowercased.
pub(crate) fn next_word(text: &str, end: usize) -> String {
    text[end..]
        .trim_start_matches(|c: char| c.is_whitespace() || c == ':' || c == '.')
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// The word preceding byte offset `start`, lowercased.
pub(crate) fn previous_word(text: &str, start: usize) -> String {
    text[..start]
        .trim_end()
        .rsplit(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or("")
        .to_lowercase()
}
