//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use invex_core::{DocumentError, InvexConfig, OcrDocument};

/// Load the explicit config file, else the user config file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvexConfig> {
    if let Some(path) = config_path {
        return InvexConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        return InvexConfig::from_file(&default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()));
    }

    Ok(InvexConfig::default())
}

/// Input kinds recognized by file extension.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "text", "json", "tsv"];

/// Read an OCR document; `-` reads plain text from stdin.
pub fn load_document(path: &Path) -> anyhow::Result<OcrDocument> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(OcrDocument::from_text(text));
    }

    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let document = match extension.as_str() {
        "txt" | "text" => OcrDocument::from_text(content),
        "json" => OcrDocument::from_json(&content)?,
        "tsv" => OcrDocument::from_tesseract_tsv(&content)?,
        other => return Err(DocumentError::UnsupportedFormat(other.to_string()).into()),
    };

    debug!(
        "Loaded {} ({} tokens, text: {})",
        path.display(),
        document.tokens.len(),
        document.text.is_some()
    );

    Ok(document)
}
