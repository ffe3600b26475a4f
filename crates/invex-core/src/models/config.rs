//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{InvexError, Result};
use crate::receipt::select::{DateSelection, TotalSelection};

/// Main configuration for the invex pipeline.
///
/// Passed explicitly to [`crate::ReceiptParser`] at construction time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvexConfig {
    /// OCR token handling.
    pub ocr: OcrInputConfig,

    /// Text normalization.
    pub normalizer: NormalizerConfig,

    /// Field extraction.
    pub extraction: ExtractionConfig,

    /// Confidence scoring weights.
    pub scoring: ScoringConfig,
}

/// How OCR tokens are turned into text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrInputConfig {
    /// Tokens below this OCR confidence (0.0 - 1.0) are dropped.
    pub min_token_confidence: f32,

    /// Tokens whose vertical centres differ by less than this fraction of
    /// the median token height are placed on the same line.
    pub line_tolerance: f32,
}

impl Default for OcrInputConfig {
    fn default() -> Self {
        Self {
            min_token_confidence: 0.0,
            line_tolerance: 0.5,
        }
    }
}

/// Text normalizer switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Collapse whitespace, trim lines and squeeze blank lines.
    pub normalize_whitespace: bool,

    /// Fix letters misread as digits inside numbers.
    pub fix_numeric_confusions: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            fix_numeric_confusions: true,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Read ambiguous numeric dates as day/month/year.
    pub day_first: bool,

    /// Maximum distance in bytes between a label and its value.
    pub label_window: usize,

    /// How the document date is chosen among candidates.
    pub date_selection: DateSelection,

    /// How the total is chosen among candidates.
    pub total_selection: TotalSelection,

    /// Number of leading lines searched for the vendor name.
    pub vendor_scan_lines: usize,

    /// Generic header lines that are never a vendor name.
    pub vendor_stoplist: Vec<String>,

    /// Suffixes marking a line as a company name.
    pub company_suffixes: Vec<String>,

    /// Maximum number of lines joined into the address.
    pub max_address_lines: usize,

    /// Compare the line item sum against the total.
    pub check_line_item_sum: bool,

    /// Allowed difference between line item sum and total.
    pub line_item_tolerance: f64,

    /// Keep the normalized text in the result.
    pub include_raw_text: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            day_first: true,
            label_window: 40,
            date_selection: DateSelection::default(),
            total_selection: TotalSelection::default(),
            vendor_scan_lines: 10,
            vendor_stoplist: [
                "tax invoice",
                "invoice",
                "receipt",
                "official receipt",
                "cash sale",
                "cash bill",
                "simplified tax invoice",
                "copy",
                "welcome",
                "thank you",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            company_suffixes: [
                "SDN BHD",
                "SDN. BHD.",
                "BHD",
                "INC",
                "LTD",
                "LLC",
                "PLC",
                "CORP",
                "PTY",
                "PVT",
                "GMBH",
                "ENTERPRISE",
                "TRADING",
                "CO.",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            max_address_lines: 4,
            check_line_item_sum: true,
            line_item_tolerance: 0.01,
            include_raw_text: false,
        }
    }
}

/// Per-field weights for the confidence score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub vendor: u32,
    pub date: u32,
    pub total_amount: u32,
    pub receipt_number: u32,
    pub address: u32,
    pub bill_to: u32,
    pub items: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            vendor: 25,
            date: 25,
            total_amount: 25,
            receipt_number: 10,
            address: 5,
            bill_to: 5,
            items: 5,
        }
    }
}

impl ScoringConfig {
    /// Weights in field order.
    pub fn weights(&self) -> [u32; 7] {
        [
            self.vendor,
            self.date,
            self.total_amount,
            self.receipt_number,
            self.address,
            self.bill_to,
            self.items,
        ]
    }

    /// Sum of all weights, `None` on overflow.
    pub fn total_weight(&self) -> Option<u32> {
        self.weights()
            .into_iter()
            .try_fold(0u32, |acc, w| acc.checked_add(w))
    }
}

impl InvexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.ocr.min_token_confidence) {
            return Err(InvexError::Config(format!(
                "ocr.min_token_confidence must be within 0.0..=1.0, got {}",
                self.ocr.min_token_confidence
            )));
        }
        if self.ocr.line_tolerance <= 0.0 {
            return Err(InvexError::Config(
                "ocr.line_tolerance must be positive".to_string(),
            ));
        }
        if self.extraction.line_item_tolerance < 0.0 {
            return Err(InvexError::Config(
                "extraction.line_item_tolerance must not be negative".to_string(),
            ));
        }
        if self.scoring.total_weight().is_none() {
            return Err(InvexError::Config(
                "scoring weights overflow when summed".to_string(),
            ));
        }
        Ok(())
    }
}
