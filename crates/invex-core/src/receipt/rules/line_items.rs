//! Line item (table row) extraction.

use rust_decimal::Decimal;

use super::amounts::AmountExtractor;
use super::patterns::{INLINE_QUANTITY, QUANTITY_PREFIX};
use super::{FieldCandidate, FieldExtractor};
use crate::models::receipt::LineItem;

const HEADER_KEYWORDS: &[&str] = &[
    "description", "desc", "item", "items", "qty", "quantity", "price", "amount", "total", "unit",
    "amt",
];

const SECTION_END_WORDS: &[&str] = &[
    "total", "subtotal", "sub", "tax", "gst", "sst", "vat", "rounding", "round", "change", "cash",
    "grand", "nett", "net", "balance", "tendered", "paid",
];

/// Line item extractor.
///
/// Rows are read inside a table section (a header line naming at least two
/// columns, up to the totals). Outside a section only rows whose
/// `quantity × unit price` matches the line total are accepted.
pub struct LineItemExtractor {
    tolerance: Decimal,
}

impl LineItemExtractor {
    pub fn new() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
        }
    }
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for LineItemExtractor {
    type Output = LineItem;

    fn extract_all(&self, text: &str) -> Vec<FieldCandidate<LineItem>> {
        let mut results = Vec::new();
        let mut in_section = false;
        let mut pending: Vec<&str> = Vec::new();

        for raw_line in text.lines() {
            let line = raw_line.trim();

            if !in_section {
                if is_header(line) {
                    in_section = true;
                    pending.clear();
                } else if let Some(item) = self.strict_row(line) {
                    results.push(FieldCandidate::new(item, 0.7, line));
                }
                continue;
            }

            if ends_section(line) {
                in_section = false;
                pending.clear();
                continue;
            }

            let Some((description, amounts)) = split_row(line) else {
                if line.chars().any(char::is_alphabetic) {
                    pending.push(line);
                }
                continue;
            };

            let (quantity, description) = self.quantity(description, &amounts);
            let description = pending
                .drain(..)
                .chain(std::iter::once(description))
                .filter(|d| !d.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            if !description.chars().any(char::is_alphabetic) {
                continue;
            }

            results.push(FieldCandidate::new(
                build_item(description, quantity, &amounts),
                0.8,
                line,
            ));
        }

        results
    }
}

impl LineItemExtractor {
    /// Split off the quantity from a row description.
    fn quantity<'a>(&self, description: &'a str, amounts: &[Decimal]) -> (u32, &'a str) {
        if let Some(caps) = QUANTITY_PREFIX.captures(description) {
            if let (Some(m), Ok(qty)) = (caps.get(0), caps[1].parse::<u32>()) {
                if qty > 0 {
                    return (qty, description[m.end()..].trim());
                }
            }
        }

        if let Some(caps) = INLINE_QUANTITY.captures(description) {
            if let (Some(m), Ok(qty)) = (caps.get(0), caps[1].parse::<u32>()) {
                if qty > 0 {
                    return (qty, description[..m.start()].trim());
                }
            }
        }

        // "Teh Tarik 2 4.50 9.00": bare trailing count, checked against the amounts
        if let [.., unit, total] = amounts {
            if let Some((rest, last)) = description.rsplit_once(' ') {
                if let Ok(qty) = last.parse::<u32>() {
                    if qty > 0 && self.consistent(qty, *unit, *total) {
                        return (qty, rest.trim());
                    }
                }
            }
        }

        (1, description)
    }

    /// `quantity * unit` matches `total`; overflow counts as a mismatch.
    fn consistent(&self, quantity: u32, unit: Decimal, total: Decimal) -> bool {
        Decimal::from(quantity)
            .checked_mul(unit)
            .and_then(|product| product.checked_sub(total))
            .is_some_and(|diff| diff.abs() <= self.tolerance)
    }

    /// `qty description unit_price total` with a matching product.
    fn strict_row(&self, line: &str) -> Option<LineItem> {
        let (description, amounts) = split_row(line)?;
        let [.., unit, total] = amounts.as_slice() else {
            return None;
        };

        let (quantity, description) = self.quantity(description, &amounts);
        if !description.chars().any(char::is_alphabetic) || !self.consistent(quantity, *unit, *total) {
            return None;
        }

        Some(build_item(description.to_string(), quantity, &amounts))
    }
}

fn build_item(description: String, quantity: u32, amounts: &[Decimal]) -> LineItem {
    let total = amounts.last().copied().unwrap_or_default();
    let unit_price = match amounts {
        [.., unit, _] => *unit,
        _ => (total / Decimal::from(quantity.max(1))).round_dp(2),
    };

    LineItem {
        description,
        quantity,
        unit_price,
        total,
    }
}

/// Description and trailing amounts of a row, if it ends with an amount.
fn split_row(line: &str) -> Option<(&str, Vec<Decimal>)> {
    let candidates = AmountExtractor::new().extract_all(line);
    let first = candidates.first()?;
    let last = candidates.last()?;

    let (first_start, _) = first.position?;
    let (_, last_end) = last.position?;
    if !line[last_end..].trim().is_empty() {
        return None;
    }

    let description = line[..first_start].trim();
    Some((description, candidates.into_iter().map(|c| c.value).collect()))
}

fn words(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

fn is_header(line: &str) -> bool {
    if line.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    let mut found: Vec<String> = words(line)
        .filter(|w| HEADER_KEYWORDS.contains(&w.as_str()))
        .collect();
    found.sort();
    found.dedup();
    found.len() >= 2
}

fn ends_section(line: &str) -> bool {
    let lower = line.to_lowercase();
    matches!(words(line).next(), Some(w) if SECTION_END_WORDS.contains(&w.as_str()))
        || lower.contains("subtotal")
        || lower.contains("sub total")
}
