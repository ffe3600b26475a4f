//! Billed party extraction.

use super::patterns::{BILL_TO, EMAIL, FIELD_LABEL_LINE};
use super::{FieldCandidate, FieldExtractor};
use crate::models::receipt::BillTo;

/// Bill-to extractor.
///
/// The value follows the heading on the same line (`Bill To: ACME`) or sits
/// on the next non-empty line.
pub struct BillToExtractor;

impl BillToExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BillToExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BillToExtractor {
    type Output = BillTo;

    fn extract_all(&self, text: &str) -> Vec<FieldCandidate<BillTo>> {
        let mut results = Vec::new();

        for m in BILL_TO.find_iter(text) {
            let rest = &text[m.end()..];
            let (same_line, following) = rest.split_once('\n').unwrap_or((rest, ""));

            let inline = same_line
                .trim_start()
                .trim_start_matches([':', '-'])
                .trim();

            let (value, confidence) = if !inline.is_empty() {
                (inline, 0.9)
            } else {
                let next = following.lines().map(str::trim).find(|l| !l.is_empty());
                match next {
                    Some(line) if !FIELD_LABEL_LINE.is_match(line) => (line, 0.7),
                    _ => continue,
                }
            };

            if let Some(bill_to) = parse_party(value) {
                results.push(
                    FieldCandidate::new(bill_to, confidence, value)
                        .with_position(m.start(), m.end()),
                );
            }
        }

        results
    }
}

/// Split a `name <email>` value into a [`BillTo`].
fn parse_party(value: &str) -> Option<BillTo> {
    let email = EMAIL.find(value).map(|m| m.as_str().to_string());

    let name = match &email {
        Some(email) => value.replace(email.as_str(), ""),
        None => value.to_string(),
    };
    let name = name
        .trim_matches(|c: char| c.is_whitespace() || "<>()[],;:-".contains(c))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if name.chars().count() <= 2 {
        return None;
    }

    Some(BillTo { name, email })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inline_bill_to() {
        let result = BillToExtractor::new().extract("Bill To: Acme Corp").unwrap();

        assert_eq!(
            result.value,
            BillTo {
                name: "Acme Corp".to_string(),
                email: None
            }
        );
    }

    #[test]
    fn test_next_line_with_email() {
        let text = "BILLED TO\nJohn Tan <john.tan@example.com>\nDate: 01/02/2019";
        let result = BillToExtractor::new().extract(text).unwrap();

        assert_eq!(result.value.name, "John Tan");
        assert_eq!(result.value.email.as_deref(), Some("john.tan@example.com"));
    }

    #[test]
    fn test_short_names_rejected() {
        assert!(BillToExtractor::new().extract("Customer: NA").is_none());
        assert!(BillToExtractor::new().extract("Sold to:\nTel: 012-3456789").is_none());
    }

    #[test]
    fn test_no_heading() {
        assert!(BillToExtractor::new().extract("ACME SDN BHD\nTOTAL 1.00").is_none());
    }
}
