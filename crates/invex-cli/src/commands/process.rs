//! Process command - extract fields from a single OCR output file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use invex_core::{ExtractionResult, ReceiptExtractor, ReceiptParser};

use super::{load_config, load_document};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (.txt, .json or Tesseract .tsv), or `-` for stdin text
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Show extraction confidence and validation notes
    #[arg(long)]
    show_confidence: bool,

    /// Include the normalized text in the result
    #[arg(long)]
    raw_text: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.raw_text {
        config.extraction.include_raw_text = true;
    }

    info!("Processing file: {}", args.input.display());

    let document = load_document(&args.input)?;
    let parser = ReceiptParser::new(config);
    let result = parser.extract(&document);

    let output = format_result(&result, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        eprintln!();
        eprintln!(
            "{} Extraction confidence: {}%",
            style("ℹ").blue(),
            result.extraction_confidence
        );
        if result.validation_passed {
            eprintln!("{} Validation passed", style("✓").green());
        } else {
            eprintln!("{}", style("Validation issues:").yellow());
            for note in &result.validation_notes {
                eprintln!("  - {}", note);
            }
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a result in the requested format.
pub fn format_result(result: &ExtractionResult, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

/// CSV column names shared by single results and batch summaries.
pub const CSV_COLUMNS: [&str; 10] = [
    "receipt_number",
    "date",
    "vendor",
    "address",
    "bill_to_name",
    "bill_to_email",
    "total_amount",
    "items",
    "extraction_confidence",
    "validation_passed",
];

/// One CSV row, in [`CSV_COLUMNS`] order.
pub fn csv_row(result: &ExtractionResult) -> [String; 10] {
    [
        result.receipt_number.clone().unwrap_or_default(),
        result.date.clone().unwrap_or_default(),
        result.vendor.clone().unwrap_or_default(),
        result.address.clone().unwrap_or_default(),
        result.bill_to.as_ref().map(|b| b.name.clone()).unwrap_or_default(),
        result
            .bill_to
            .as_ref()
            .and_then(|b| b.email.clone())
            .unwrap_or_default(),
        result.total_amount.map(|t| t.to_string()).unwrap_or_default(),
        result.items.len().to_string(),
        result.extraction_confidence.to_string(),
        result.validation_passed.to_string(),
    ]
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(CSV_COLUMNS)?;
    wtr.write_record(csv_row(result))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let field = |value: Option<&str>| value.unwrap_or("-").to_string();
    let mut output = String::new();

    output.push_str(&format!("Vendor:  {}\n", field(result.vendor.as_deref())));
    output.push_str(&format!("Address: {}\n", field(result.address.as_deref())));
    output.push_str(&format!("Date:    {}\n", field(result.date.as_deref())));
    output.push_str(&format!("Receipt: {}\n", field(result.receipt_number.as_deref())));

    if let Some(bill_to) = &result.bill_to {
        output.push_str(&format!("Bill to: {}", bill_to.name));
        if let Some(email) = &bill_to.email {
            output.push_str(&format!(" <{}>", email));
        }
        output.push('\n');
    }

    if !result.items.is_empty() {
        output.push_str("\nItems:\n");
        for item in &result.items {
            output.push_str(&format!(
                "  {} x {} @ {} = {}\n",
                item.quantity, item.description, item.unit_price, item.total
            ));
        }
    }

    output.push('\n');
    output.push_str(&format!(
        "Total:      {}\n",
        result.total_amount.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!("Confidence: {}%\n", result.extraction_confidence));
    output.push_str(&format!(
        "Validation: {}\n",
        if result.validation_passed { "passed" } else { "failed" }
    ));

    output
}
