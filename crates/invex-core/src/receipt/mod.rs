//! Receipt and invoice field extraction.

pub mod confidence;
pub mod normalize;
mod parser;
pub mod rules;
pub mod select;
pub mod validator;

pub use confidence::{ConfidenceScorer, ResolvedFields};
pub use normalize::TextNormalizer;
pub use parser::ReceiptParser;
pub use select::{CandidateSelector, DateSelection, TotalSelection};
pub use validator::{ValidationReport, Validator};

use crate::models::receipt::ExtractionResult;
use crate::ocr::OcrDocument;

/// Trait for receipt field extractors.
///
/// Extraction is infallible: unreadable input yields a result with every
/// field unresolved.
pub trait ReceiptExtractor {
    /// Extract receipt data from an OCR document.
    fn extract(&self, document: &OcrDocument) -> ExtractionResult;

    /// Extract receipt data from plain text.
    fn extract_from_text(&self, text: &str) -> ExtractionResult;
}
