//! OCR document model consumed by the extraction pipeline.
//!
//! OCR itself runs outside this crate. Engines hand over either plain text
//! or word tokens with quadrilateral bounding boxes; when only tokens are
//! available the text is rebuilt in reading order.

mod tesseract;

pub use tesseract::parse_tesseract_tsv;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DocumentError;
use crate::models::config::OcrInputConfig;

/// Coordinate space of token bounding boxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxSpace {
    /// Pixel coordinates of the source image.
    #[default]
    Pixel,
    /// Normalized 0 - 1000 coordinates.
    Normalized,
}

/// A recognized word with its coordinates and OCR confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrToken {
    /// Recognized text content.
    pub text: String,

    /// Bounding box corners (x1, y1, x2, y2, x3, y3, x4, y4), clockwise from top-left.
    pub bbox: [f32; 8],

    /// Recognition confidence (0.0 - 1.0).
    #[serde(default = "default_token_confidence")]
    pub confidence: f32,
}

fn default_token_confidence() -> f32 {
    1.0
}

impl OcrToken {
    /// Create a token from an axis-aligned rectangle.
    pub fn from_rect(text: impl Into<String>, left: f32, top: f32, right: f32, bottom: f32, confidence: f32) -> Self {
        Self {
            text: text.into(),
            bbox: [left, top, right, top, right, bottom, left, bottom],
            confidence,
        }
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> (f32, f32) {
        let x = (self.bbox[0] + self.bbox[2] + self.bbox[4] + self.bbox[6]) / 4.0;
        let y = (self.bbox[1] + self.bbox[3] + self.bbox[5] + self.bbox[7]) / 4.0;
        (x, y)
    }

    /// Get the height of the bounding box.
    pub fn height(&self) -> f32 {
        let (_, min_y, _, max_y) = self.rect();
        max_y - min_y
    }

    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// OCR output for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrDocument {
    /// Recognized word tokens in engine order.
    #[serde(default)]
    pub tokens: Vec<OcrToken>,

    /// Full text as reported by the engine, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Source image dimensions (width, height).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<(u32, u32)>,

    /// Coordinate space of `tokens`.
    #[serde(default)]
    pub box_space: BoxSpace,
}

impl OcrDocument {
    /// Document from plain text without geometry.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Document from tokens only.
    pub fn from_tokens(tokens: Vec<OcrToken>) -> Self {
        Self {
            tokens,
            ..Default::default()
        }
    }

    /// Parse the JSON document format.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let doc: Self = serde_json::from_str(json)?;
        doc.check_boxes()?;
        Ok(doc)
    }

    /// Parse Tesseract `image_to_data` TSV output.
    pub fn from_tesseract_tsv(tsv: &str) -> crate::Result<Self> {
        Ok(parse_tesseract_tsv(tsv)?)
    }

    /// True when the document carries neither text nor tokens.
    pub fn is_blank(&self) -> bool {
        self.text.as_deref().is_none_or(|t| t.trim().is_empty())
            && self.tokens.iter().all(|t| t.text.trim().is_empty())
    }

    /// Text used for extraction.
    ///
    /// Engine text wins when present; otherwise tokens are laid out in
    /// reading order.
    pub fn full_text(&self, config: &OcrInputConfig) -> String {
        match &self.text {
            Some(text) if !text.trim().is_empty() => text.clone(),
            _ => self.reading_order_text(config),
        }
    }

    /// Rebuild text from tokens: one output line per visual line, tokens
    /// left to right, lines top to bottom.
    pub fn reading_order_text(&self, config: &OcrInputConfig) -> String {
        self.reading_order_lines(config)
            .iter()
            .map(|line| {
                line.iter()
                    .map(|t| t.text.trim())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Group kept tokens into visual lines.
    pub fn reading_order_lines(&self, config: &OcrInputConfig) -> Vec<Vec<&OcrToken>> {
        let mut tokens: Vec<&OcrToken> = self
            .tokens
            .iter()
            .filter(|t| !t.text.trim().is_empty())
            .filter(|t| t.confidence >= config.min_token_confidence)
            .collect();

        let dropped = self.tokens.len() - tokens.len();
        if dropped > 0 {
            warn!(
                "Skipped {} of {} OCR tokens (empty or below confidence {})",
                dropped,
                self.tokens.len(),
                config.min_token_confidence
            );
        }

        if tokens.is_empty() {
            return Vec::new();
        }

        let mut heights: Vec<f32> = tokens.iter().map(|t| t.height()).collect();
        heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median_height = heights[heights.len() / 2].max(1.0);
        let tolerance = median_height * config.line_tolerance;

        tokens.sort_by(|a, b| {
            a.center()
                .1
                .partial_cmp(&b.center().1)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut lines: Vec<Vec<&OcrToken>> = Vec::new();
        let mut current_y = f32::NEG_INFINITY;

        for token in tokens {
            let (_, y) = token.center();
            match lines.last_mut() {
                Some(line) if (y - current_y).abs() <= tolerance => line.push(token),
                _ => {
                    lines.push(vec![token]);
                    current_y = y;
                }
            }
        }

        for line in &mut lines {
            line.sort_by(|a, b| {
                a.rect()
                    .0
                    .partial_cmp(&b.rect().0)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        lines
    }

    /// Convert pixel boxes to the normalized 0 - 1000 space.
    ///
    /// Returns `None` when the image size is unknown.
    pub fn normalized(&self) -> Option<Self> {
        if self.box_space == BoxSpace::Normalized {
            return Some(self.clone());
        }
        let (width, height) = self.image_size?;
        if width == 0 || height == 0 {
            return None;
        }

        let mut doc = self.clone();
        for token in &mut doc.tokens {
            for (i, coord) in token.bbox.iter_mut().enumerate() {
                let extent = if i % 2 == 0 { width } else { height };
                *coord = (1000.0 * *coord / extent as f32).clamp(0.0, 1000.0).trunc();
            }
        }
        doc.box_space = BoxSpace::Normalized;
        Some(doc)
    }

    fn check_boxes(&self) -> std::result::Result<(), DocumentError> {
        for (index, token) in self.tokens.iter().enumerate() {
            if token.bbox.iter().any(|c| !c.is_finite()) {
                return Err(DocumentError::InvalidBox {
                    index,
                    reason: "non-finite coordinate".to_string(),
                });
            }
            if self.box_space == BoxSpace::Normalized
                && token.bbox.iter().any(|c| !(0.0..=1000.0).contains(c))
            {
                return Err(DocumentError::InvalidBox {
                    index,
                    reason: "coordinate outside 0..=1000".to_string(),
                });
            }
        }
        Ok(())
    }
}
