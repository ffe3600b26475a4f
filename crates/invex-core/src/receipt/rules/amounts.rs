//! Amount and total extraction.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{AMOUNT_PATTERN, LABELED_AMOUNT, TOTAL_LABEL};
use super::{assign_label_distances, label_spans, next_word, previous_word, FieldCandidate, FieldExtractor};

/// Words after `total` that make it something other than the grand total.
const NON_TOTAL_QUALIFIERS: &[&str] = &[
    "qty", "quantity", "items", "item", "tax", "gst", "sst", "vat", "discount", "discounts",
    "savings", "saving", "excl", "exclusive", "excluding",
];

/// Currency amount extractor.
///
/// Matches amounts with exactly two decimals, optionally prefixed by a
/// currency symbol. Date fragments such as `15.01` in `15.01.2019` and
/// percentages are skipped.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = Decimal;

    fn extract_all(&self, text: &str) -> Vec<FieldCandidate<Decimal>> {
        let mut results = Vec::new();

        for caps in AMOUNT_PATTERN.captures_iter(text) {
            let (Some(full_match), Some(number)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            if is_date_fragment(text, number.start(), number.end()) || is_percentage(text, number.end()) {
                continue;
            }

            if let Some(amount) = parse_amount(number.as_str()) {
                results.push(
                    FieldCandidate::new(amount, 0.8, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Grand total extractor.
///
/// Candidates are every currency amount in the text (label distance set
/// when a total label precedes it) plus values printed right after a total
/// label, which may lack decimals.
pub struct TotalExtractor {
    label_window: usize,
}

impl TotalExtractor {
    pub fn new() -> Self {
        Self { label_window: 40 }
    }

    /// Set the maximum label-to-value distance.
    pub fn with_label_window(mut self, window: usize) -> Self {
        self.label_window = window;
        self
    }
}

impl Default for TotalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TotalExtractor {
    type Output = Decimal;

    fn extract_all(&self, text: &str) -> Vec<FieldCandidate<Decimal>> {
        let labels = total_labels(text);
        let mut results = AmountExtractor::new().extract_all(text);

        // Values directly after a label, including whole numbers.
        for &(_, label_end) in &labels {
            let Some(caps) = LABELED_AMOUNT.captures(&text[label_end..]) else {
                continue;
            };
            let Some(number) = caps.get(1) else {
                continue;
            };
            let start = label_end + number.start();
            let end = label_end + number.end();

            if results.iter().any(|r| r.position.is_some_and(|(s, e)| start < e && s < end)) {
                continue;
            }
            if let Some(amount) = parse_amount(number.as_str()) {
                results.push(FieldCandidate::new(amount, 0.7, number.as_str()).with_position(start, end));
            }
        }

        results.sort_by_key(|r| r.start());
        assign_label_distances(&mut results, &labels, self.label_window);

        for candidate in &mut results {
            if candidate.is_labeled() {
                candidate.confidence = (candidate.confidence + 0.2).min(1.0);
            }
        }

        results
    }
}

/// Spans of total labels, without `subtotal`, `total qty` and the like.
fn total_labels(text: &str) -> Vec<(usize, usize)> {
    label_spans(text, &TOTAL_LABEL, |text, start, end| {
        let next = next_word(text, end);
        let prev = previous_word(text, start);
        !NON_TOTAL_QUALIFIERS.contains(&next.as_str()) && prev != "sub"
    })
}

/// All currency amounts observed in the text.
pub fn extract_amounts(text: &str) -> Vec<Decimal> {
    AmountExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|c| c.value)
        .collect()
}

fn is_date_fragment(text: &str, start: usize, end: usize) -> bool {
    let bytes = text.as_bytes();
    let is_date_sep = |b: u8| b == b'.' || b == b'/' || b == b'-';

    let followed = end + 1 < bytes.len() && is_date_sep(bytes[end]) && bytes[end + 1].is_ascii_digit();
    let preceded = start >= 2 && is_date_sep(bytes[start - 1]) && bytes[start - 2].is_ascii_digit();

    followed || preceded
}

fn is_percentage(text: &str, end: usize) -> bool {
    text[end..].trim_start().starts_with('%')
}

/// Parse an amount such as `1,234.56`, `1.234,56`, `1234,56` or `193`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // Both present: the last one is the decimal separator
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        // Comma only: decimal when followed by 1-2 digits, else thousands
        (Some(c), None) if cleaned.len() - c - 1 <= 2 && cleaned.matches(',').count() == 1 => {
            cleaned.replace(',', ".")
        }
        (Some(_), None) => cleaned.replace(',', ""),
        _ => cleaned,
    };

    Decimal::from_str(&normalized).ok()
}
