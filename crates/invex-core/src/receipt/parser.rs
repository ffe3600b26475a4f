//! Rule-based receipt parser.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::config::InvexConfig;
use crate::models::receipt::ExtractionResult;
use crate::ocr::OcrDocument;

use super::confidence::{ConfidenceScorer, ResolvedFields};
use super::normalize::TextNormalizer;
use super::rules::{
    extract_amounts, format_date, AddressExtractor, BillToExtractor, DateExtractor, FieldCandidate,
    FieldExtractor, LineItemExtractor, ReceiptNumberExtractor, TotalExtractor, VendorExtractor,
};
use super::select::CandidateSelector;
use super::validator::Validator;
use super::ReceiptExtractor;

/// Receipt parser running normalization, extraction, selection,
/// validation and scoring over one document.
///
/// The parser holds no mutable state and can be shared across threads.
pub struct ReceiptParser {
    config: InvexConfig,
    normalizer: TextNormalizer,
    dates: DateExtractor,
    totals: TotalExtractor,
    vendor: VendorExtractor,
    address: AddressExtractor,
    receipt_number: ReceiptNumberExtractor,
    bill_to: BillToExtractor,
    line_items: LineItemExtractor,
    date_selector: Box<dyn CandidateSelector<NaiveDate>>,
    total_selector: Box<dyn CandidateSelector<Decimal>>,
    validator: Validator,
    scorer: ConfidenceScorer,
}

impl ReceiptParser {
    /// Create a parser from an explicit configuration.
    pub fn new(config: InvexConfig) -> Self {
        let extraction = &config.extraction;

        Self {
            normalizer: TextNormalizer::new(config.normalizer.clone()),
            dates: DateExtractor::new()
                .with_day_first(extraction.day_first)
                .with_label_window(extraction.label_window),
            totals: TotalExtractor::new().with_label_window(extraction.label_window),
            vendor: VendorExtractor::from_config(extraction),
            address: AddressExtractor::from_config(extraction),
            receipt_number: ReceiptNumberExtractor::new(),
            bill_to: BillToExtractor::new(),
            line_items: LineItemExtractor::new(),
            date_selector: Box::new(extraction.date_selection),
            total_selector: Box::new(extraction.total_selection),
            validator: Validator::from_config(extraction),
            scorer: ConfidenceScorer::new(config.scoring.clone()),
            config,
        }
    }

    /// Replace the date selection strategy.
    pub fn with_date_selector(mut self, selector: impl CandidateSelector<NaiveDate> + 'static) -> Self {
        self.date_selector = Box::new(selector);
        self
    }

    /// Replace the total selection strategy.
    pub fn with_total_selector(mut self, selector: impl CandidateSelector<Decimal> + 'static) -> Self {
        self.total_selector = Box::new(selector);
        self
    }

    /// Configuration the parser was built with.
    pub fn config(&self) -> &InvexConfig {
        &self.config
    }

    /// Parse receipt fields from raw OCR text.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let text = self.normalizer.normalize(text);

        if text.trim().is_empty() {
            debug!("Empty document, nothing to extract");
            return ExtractionResult::empty();
        }

        info!("Parsing receipt from {} characters of text", text.len());

        let dates = self.dates.extract_all(&text);
        let date = self.date_selector.select(&dates);

        let totals = self.totals.extract_all(&text);
        let total = self.total_selector.select(&totals);

        let vendor = self.vendor.extract(&text);
        let address = self.address.extract(&text);
        let receipt_number = self.receipt_number.extract(&text);
        let bill_to = self.bill_to.extract(&text);
        let items = self.line_items.extract_all(&text);

        let items_confidence = (!items.is_empty())
            .then(|| items.iter().map(|i| i.confidence).sum::<f32>() / items.len() as f32);

        let resolved = ResolvedFields {
            vendor: confidence_of(vendor.as_ref()),
            date: confidence_of(date),
            total_amount: confidence_of(total),
            receipt_number: confidence_of(receipt_number.as_ref()),
            address: confidence_of(address.as_ref()),
            bill_to: confidence_of(bill_to.as_ref()),
            items: items_confidence,
        };

        let items: Vec<_> = items.into_iter().map(|c| c.value).collect();
        let total_amount = total.map(|c| c.value);

        let observed = extract_amounts(&text);
        let report = self.validator.validate(total_amount, &items, &observed);
        for note in &report.notes {
            debug!("Validation: {}", note);
        }

        let result = ExtractionResult {
            receipt_number: receipt_number.map(|c| c.value),
            date: date.map(|c| format_date(c.value)),
            bill_to: bill_to.map(|c| c.value),
            items,
            total_amount,
            extraction_confidence: self.scorer.score(&resolved),
            validation_passed: report.passed,
            vendor: vendor.map(|c| c.value),
            address: address.map(|c| c.value),
            validation_notes: report.notes,
            raw_text: self.config.extraction.include_raw_text.then(|| text.clone()),
        };

        let missing = result.missing_fields();
        if !missing.is_empty() {
            debug!("Unresolved fields: {}", missing.join(", "));
        }
        debug!(
            "Extracted receipt with confidence {} (validation {})",
            result.extraction_confidence,
            if result.validation_passed { "passed" } else { "failed" }
        );

        result
    }
}

fn confidence_of<T>(candidate: Option<&FieldCandidate<T>>) -> Option<f32> {
    candidate.map(|c| c.confidence)
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new(InvexConfig::default())
    }
}

impl ReceiptExtractor for ReceiptParser {
    fn extract(&self, document: &OcrDocument) -> ExtractionResult {
        if document.is_blank() {
            debug!("Blank OCR document");
            return ExtractionResult::empty();
        }

        let text = document.full_text(&self.config.ocr);
        debug!("OCR document with {} tokens", document.tokens.len());
        self.parse(&text)
    }

    fn extract_from_text(&self, text: &str) -> ExtractionResult {
        self.parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::OcrToken;
    use crate::receipt::select::TotalSelection;

    const OJC: &str = "OJC MARKETING SDN BHD\nNO JALAN BAYU 4, BANDAR SERI ALAM, 81750 MASAI, JOHOR\nDATE: 15/01/2019\nRECEIPT NO: PEGIV-1030765\nTOTAL: 193.00";

    #[test]
    fn test_parse_basic_receipt() {
        let result = ReceiptParser::default().parse(OJC);

        assert_eq!(result.vendor.as_deref(), Some("OJC MARKETING SDN BHD"));
        assert_eq!(
            result.address.as_deref(),
            Some("NO JALAN BAYU 4, BANDAR SERI ALAM, 81750 MASAI, JOHOR")
        );
        assert_eq!(result.date.as_deref(), Some("15/01/2019"));
        assert_eq!(result.receipt_number.as_deref(), Some("PEGIV-1030765"));
        assert_eq!(result.total_amount, Some(Decimal::new(19300, 2)));
        assert!(result.validation_passed);
        assert!(result.extraction_confidence > 50);
    }

    #[test]
    fn test_custom_total_selector() {
        let parser = ReceiptParser::default().with_total_selector(TotalSelection::Largest);
        let result = parser.parse("TOTAL: 50.00\n120.00");

        assert_eq!(result.total_amount, Some(Decimal::new(12000, 2)));
    }

    #[test]
    fn test_raw_text_only_when_enabled() {
        assert!(ReceiptParser::default().parse(OJC).raw_text.is_none());

        let mut config = InvexConfig::default();
        config.extraction.include_raw_text = true;
        let result = ReceiptParser::new(config).parse("ACME  SDN BHD\r\nTOTAL 1.00");
        assert_eq!(result.raw_text.as_deref(), Some("ACME SDN BHD\nTOTAL 1.00"));
    }

    #[test]
    fn test_extract_from_tokens() {
        let tokens = vec![
            OcrToken::from_rect("TOTAL:", 10.0, 100.0, 60.0, 120.0, 0.9),
            OcrToken::from_rect("ACME", 10.0, 10.0, 50.0, 30.0, 0.9),
            OcrToken::from_rect("SDN", 55.0, 10.0, 80.0, 30.0, 0.9),
            OcrToken::from_rect("BHD", 85.0, 10.0, 110.0, 30.0, 0.9),
            OcrToken::from_rect("12.50", 70.0, 101.0, 110.0, 121.0, 0.9),
        ];
        let result = ReceiptParser::default().extract(&OcrDocument::from_tokens(tokens));

        assert_eq!(result.vendor.as_deref(), Some("ACME SDN BHD"));
        assert_eq!(result.total_amount, Some(Decimal::new(1250, 2)));
    }

    #[test]
    fn test_empty_document() {
        let parser = ReceiptParser::default();

        assert_eq!(parser.parse(""), ExtractionResult::empty());
        assert_eq!(parser.parse("  \n\t\n"), ExtractionResult::empty());
        assert_eq!(parser.extract(&OcrDocument::from_tokens(Vec::new())), ExtractionResult::empty());
    }
}
