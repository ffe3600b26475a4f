//! Candidate selection strategies.
//!
//! Each field with competing candidates (date, total) picks one of them
//! through a [`CandidateSelector`]. The built-in strategies are plain enums
//! so they can be chosen from configuration; custom ones can be passed to
//! [`crate::ReceiptParser`] directly.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rules::FieldCandidate;

/// Picks one candidate out of many.
pub trait CandidateSelector<T>: Send + Sync {
    /// Select a candidate, or `None` when nothing is acceptable.
    fn select<'a>(&self, candidates: &'a [FieldCandidate<T>]) -> Option<&'a FieldCandidate<T>>;
}

/// Built-in date selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSelection {
    /// Closest labeled date, else the first date in the document.
    #[default]
    NearestLabel,
    /// First date in document order.
    First,
    /// Chronologically latest date.
    Latest,
}

/// Built-in total selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalSelection {
    /// Closest labeled amount, else the largest amount.
    #[default]
    NearestLabel,
    /// Largest amount.
    Largest,
    /// Last amount in document order.
    Last,
}

/// Labeled candidate with the smallest label distance, first one on ties.
pub fn nearest_label<T>(candidates: &[FieldCandidate<T>]) -> Option<&FieldCandidate<T>> {
    candidates
        .iter()
        .filter_map(|c| c.label_distance.map(|d| (d, c)))
        .min_by_key(|(d, c)| (*d, c.start()))
        .map(|(_, c)| c)
}

fn first_in_document<T>(candidates: &[FieldCandidate<T>]) -> Option<&FieldCandidate<T>> {
    candidates.iter().min_by_key(|c| c.start())
}

impl CandidateSelector<NaiveDate> for DateSelection {
    fn select<'a>(&self, candidates: &'a [FieldCandidate<NaiveDate>]) -> Option<&'a FieldCandidate<NaiveDate>> {
        match self {
            DateSelection::NearestLabel => {
                nearest_label(candidates).or_else(|| first_in_document(candidates))
            }
            DateSelection::First => first_in_document(candidates),
            DateSelection::Latest => candidates.iter().max_by_key(|c| (c.value, std::cmp::Reverse(c.start()))),
        }
    }
}

impl CandidateSelector<Decimal> for TotalSelection {
    fn select<'a>(&self, candidates: &'a [FieldCandidate<Decimal>]) -> Option<&'a FieldCandidate<Decimal>> {
        let largest = || candidates.iter().max_by_key(|c| (c.value, std::cmp::Reverse(c.start())));

        match self {
            TotalSelection::NearestLabel => nearest_label(candidates).or_else(largest),
            TotalSelection::Largest => largest(),
            TotalSelection::Last => candidates.iter().max_by_key(|c| c.start()),
        }
    }
}
