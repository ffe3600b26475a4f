//! Cross-field consistency checks.

use rust_decimal::Decimal;

use crate::models::config::ExtractionConfig;
use crate::models::receipt::LineItem;

/// Outcome of validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub passed: bool,
    pub notes: Vec<String>,
}

/// Validates the selected fields against each other.
///
/// The validator flags inconsistencies and never corrects a value.
pub struct Validator {
    check_line_item_sum: bool,
    tolerance: Decimal,
}

impl Validator {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            check_line_item_sum: config.check_line_item_sum,
            tolerance: Decimal::try_from(config.line_item_tolerance).unwrap_or(Decimal::new(1, 2)),
        }
    }

    /// Enable or disable the line item sum check.
    pub fn with_line_item_check(mut self, enabled: bool) -> Self {
        self.check_line_item_sum = enabled;
        self
    }

    /// Validate a total against the observed amounts and the line items.
    pub fn validate(&self, total: Option<Decimal>, items: &[LineItem], observed: &[Decimal]) -> ValidationReport {
        let mut notes = Vec::new();

        let Some(total) = total else {
            notes.push("no total amount found".to_string());
            return ValidationReport { passed: false, notes };
        };

        if !observed.contains(&total) {
            notes.push(format!("total {total} does not appear among the amounts in the text"));
        }

        if self.check_line_item_sum && !items.is_empty() {
            match line_item_sum(items) {
                Some(sum) => {
                    let matches = sum
                        .checked_sub(total)
                        .is_some_and(|diff| diff.abs() <= self.tolerance);
                    if !matches {
                        notes.push(format!("line items sum to {sum}, total is {total}"));
                    }
                }
                None => notes.push("line item totals are too large to sum".to_string()),
            }
        }

        ValidationReport {
            passed: notes.is_empty(),
            notes,
        }
    }
}

/// Sum of the line item totals, `None` on overflow.
pub fn line_item_sum(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.total))
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(total: &str) -> LineItem {
        LineItem {
            description: "ITEM".to_string(),
            quantity: 1,
            unit_price: dec(total),
            total: dec(total),
        }
    }

    #[test]
    fn test_observed_total_passes() {
        let report = Validator::new().validate(Some(dec("193.00")), &[], &[dec("193.00"), dec("200.00")]);
        assert!(report.passed);
        assert!(report.notes.is_empty());
    }

    #[test]
    fn test_unobserved_total_fails() {
        let report = Validator::new().validate(Some(dec("193")), &[], &[dec("19.30")]);
        assert!(!report.passed);
        assert_eq!(report.notes.len(), 1);
    }

    #[test]
    fn test_missing_total_fails() {
        let report = Validator::new().validate(None, &[], &[]);
        assert!(!report.passed);
        assert_eq!(report.notes, vec!["no total amount found".to_string()]);
    }

    #[test]
    fn test_line_item_sum() {
        let items = [item("9.00"), item("2.20")];
        let observed = [dec("9.00"), dec("2.20"), dec("11.20"), dec("12.00")];

        assert!(Validator::new().validate(Some(dec("11.20")), &items, &observed).passed);
        assert!(!Validator::new().validate(Some(dec("12.00")), &items, &observed).passed);
        assert!(
            Validator::new()
                .with_line_item_check(false)
                .validate(Some(dec("12.00")), &items, &observed)
                .passed
        );
    }

    #[test]
    fn test_overflowing_line_items_fail_without_panic() {
        let huge = Decimal::MAX;
        let items = [huge_item(huge), huge_item(huge)];

        assert_eq!(line_item_sum(&items), None);

        let report = Validator::new().validate(Some(dec("1.00")), &items, &[dec("1.00")]);
        assert!(!report.passed);
        assert_eq!(report.notes, vec!["line item totals are too large to sum".to_string()]);
    }

    #[test]
    fn test_sum_minus_total_overflow_is_a_mismatch() {
        let items = [huge_item(Decimal::MAX)];
        let total = Decimal::MIN;

        let report = Validator::new().validate(Some(total), &items, &[total]);
        assert!(!report.passed);
        assert_eq!(report.notes.len(), 1);
    }

    fn huge_item(total: Decimal) -> LineItem {
        LineItem {
            description: "ITEM".to_string(),
            quantity: 1,
            unit_price: total,
            total,
        }
    }
}
