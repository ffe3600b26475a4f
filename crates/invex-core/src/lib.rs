//! Core library for receipt and invoice field extraction.
//!
//! This crate provides:
//! - OCR document model (word tokens with bounding boxes, Tesseract TSV input)
//! - Text normalization for common OCR confusions
//! - Rule-based field extraction (vendor, address, date, receipt number,
//!   bill-to, line items, total)
//! - Cross-field validation and a heuristic confidence score

pub mod error;
pub mod models;
pub mod ocr;
pub mod receipt;

pub use error::{DocumentError, InvexError, Result};
pub use models::config::InvexConfig;
pub use models::receipt::{BillTo, ExtractionResult, LineItem};
pub use ocr::{BoxSpace, OcrDocument, OcrToken};
pub use receipt::{ReceiptExtractor, ReceiptParser};
