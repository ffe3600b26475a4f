//! Tesseract `image_to_data` TSV adapter.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use tracing::debug;

use super::{BoxSpace, OcrDocument, OcrToken};
use crate::error::DocumentError;

/// One row of Tesseract TSV output.
#[derive(Debug, Deserialize)]
struct TsvRow {
    level: u32,
    page_num: u32,
    block_num: u32,
    par_num: u32,
    line_num: u32,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    conf: f32,
    #[serde(default)]
    text: String,
}

/// Tesseract level of word rows.
const WORD_LEVEL: u32 = 5;

/// Parse TSV into a document.
///
/// Word rows with negative confidence or empty text are skipped. Text lines
/// follow Tesseract's own page/block/paragraph/line numbering, so the
/// result keeps the engine's layout analysis instead of re-grouping boxes.
pub fn parse_tesseract_tsv(tsv: &str) -> Result<OcrDocument, DocumentError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(tsv.as_bytes());

    let mut tokens = Vec::new();
    let mut lines: BTreeMap<(u32, u32, u32, u32), Vec<String>> = BTreeMap::new();
    let mut paragraphs_seen = BTreeSet::new();
    let mut image_size = None;

    for record in reader.deserialize() {
        let row: TsvRow = record?;

        // Level 1 rows describe the whole page.
        if row.level == 1 && image_size.is_none() {
            image_size = Some((row.width as u32, row.height as u32));
        }

        if row.level != WORD_LEVEL || row.conf < 0.0 || row.text.trim().is_empty() {
            continue;
        }

        let confidence = (row.conf / 100.0).clamp(0.0, 1.0);
        tokens.push(OcrToken::from_rect(
            row.text.trim(),
            row.left,
            row.top,
            row.left + row.width,
            row.top + row.height,
            confidence,
        ));

        paragraphs_seen.insert((row.page_num, row.block_num, row.par_num));
        lines
            .entry((row.page_num, row.block_num, row.par_num, row.line_num))
            .or_default()
            .push(row.text.trim().to_string());
    }

    // Blank line between paragraphs, as Tesseract's own text output does.
    let mut text = String::new();
    let mut previous_par = None;
    for ((page, block, par, _), words) in &lines {
        let par_key = (*page, *block, *par);
        if let Some(prev) = previous_par {
            text.push('\n');
            if prev != par_key {
                text.push('\n');
            }
        }
        text.push_str(&words.join(" "));
        previous_par = Some(par_key);
    }

    debug!(
        "Parsed {} words in {} lines from {} paragraphs of Tesseract TSV",
        tokens.len(),
        lines.len(),
        paragraphs_seen.len()
    );

    Ok(OcrDocument {
        tokens,
        text: Some(text),
        image_size,
        box_space: BoxSpace::Pixel,
    })
}
