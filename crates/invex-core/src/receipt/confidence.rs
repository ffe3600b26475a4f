//! Heuristic extraction confidence.
//!
//! The score is a weighted count of resolved fields, each weight scaled by
//! the local confidence of the selected candidate. It is a deterministic
//! quality signal, not a probability. Weights are non-negative, so adding
//! a resolved field never lowers the score.

use crate::models::config::ScoringConfig;

/// Local confidence of each resolved field; `None` means unresolved.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolvedFields {
    pub vendor: Option<f32>,
    pub date: Option<f32>,
    pub total_amount: Option<f32>,
    pub receipt_number: Option<f32>,
    pub address: Option<f32>,
    pub bill_to: Option<f32>,
    pub items: Option<f32>,
}

/// Computes the 0 - 100 extraction confidence.
pub struct ConfidenceScorer {
    weights: ScoringConfig,
}

impl ConfidenceScorer {
    pub fn new(weights: ScoringConfig) -> Self {
        Self { weights }
    }

    pub fn score(&self, fields: &ResolvedFields) -> u8 {
        let weights = self.weights.weights();
        let total_weight: f64 = weights.iter().copied().map(f64::from).sum();
        if total_weight == 0.0 {
            return 0;
        }

        let confidences = [
            fields.vendor,
            fields.date,
            fields.total_amount,
            fields.receipt_number,
            fields.address,
            fields.bill_to,
            fields.items,
        ];
        let weighted: f64 = weights
            .into_iter()
            .zip(confidences)
            .filter_map(|(weight, confidence)| {
                confidence.map(|c| f64::from(weight) * f64::from(c.clamp(0.0, 1.0)))
            })
            .sum();

        (100.0 * weighted / total_weight).round().clamp(0.0, 100.0) as u8
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
