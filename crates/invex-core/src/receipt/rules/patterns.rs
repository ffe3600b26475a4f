//! Common regex patterns for receipt and invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numeric dates: DD/MM/YYYY, DD-MM-YY, DD.MM.YYYY (or month-first)
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})\b"
    ).unwrap();

    // 15 Jan 2019, 15-JAN-19, 1st March 2020
    pub static ref DATE_TEXT_DMY: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?[\s\-/.]*(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?[\s\-/.,]*(\d{4}|\d{2})\b"
    ).unwrap();

    // January 15, 2019
    pub static ref DATE_TEXT_MDY: Regex = Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b"
    ).unwrap();

    pub static ref DATE_LABEL: Regex = Regex::new(
        r"(?i)\b(?:invoice\s+date|receipt\s+date|bill\s+date|issued?\s+date|transaction\s+date|date\s+issued|tarikh|dated|date)\b"
    ).unwrap();

    // Currency amounts: 193.00, 1,234.56, 1.234,56, RM 12.50, $9.99
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(?i)(?:(?:\b(?:RM|MYR|USD|EUR|GBP|SGD|RS\.?)|[$€£])\s*)?(\d{1,3}(?:,\d{3})+\.\d{2}|\d{1,3}(?:\.\d{3})+,\d{2}|\d+[.,]\d{2})\b"
    ).unwrap();

    pub static ref TOTAL_LABEL: Regex = Regex::new(
        r"(?i)\b(?:grand\s*total|nett?\s*total|total\s*amount|total\s*due|total\s*payable|amount\s*due|amount\s*payable|balance\s*due|total)\b"
    ).unwrap();

    // Value right after a total label; decimals optional.
    pub static ref LABELED_AMOUNT: Regex = Regex::new(
        r"(?i)^[ \t]*(?:\([^)\n]*\))?[ \t]*[:=\-]?[ \t]*(?:(?:RM|MYR|USD|EUR|GBP|SGD|RS\.?)|[$€£])?[ \t]*(\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:[.,]\d{1,2})?)\b"
    ).unwrap();

    // Invoice / receipt numbers
    pub static ref RECEIPT_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:tax[ \t]+)?(?:invoice|receipt|bill|inv|doc(?:ument)?|transaction|trans|txn|ref(?:erence)?|order|chq|cheque)[ \t]*(?:no\b\.?|num(?:ber)?\b\.?|#)[ \t]*[:#.]?[ \t]*([A-Z0-9][A-Z0-9\-/]{2,})"
    ).unwrap();

    // Bill-to headings
    pub static ref BILL_TO: Regex = Regex::new(
        r"(?i)\b(?:bill(?:ed)?\s+to|billing\s+name|sold\s+to|customer(?:\s+name)?)\b"
    ).unwrap();

    // Address markers
    pub static ref STREET_WORD: Regex = Regex::new(
        r"(?i)\b(?:jalan|jln|lorong|lrg|taman|tmn|persiaran|lebuh|bandar|kampung|kg|road|rd|street|st|avenue|ave|blvd|boulevard|lane|highway|hwy|lot|no|block|blk|suite|floor|flr|level)\b"
    ).unwrap();

    pub static ref POSTAL_CODE: Regex = Regex::new(
        r"\b\d{4,6}\b"
    ).unwrap();

    // A line that starts with a field label
    pub static ref FIELD_LABEL_LINE: Regex = Regex::new(
        r"(?i)^\W*(?:tel|phone|fax|mobile|h/?p|e-?mail|website|www|gst|roc|co\.?\s*reg|company\s+reg|reg\.?\s*no|sst|tax|date|time|cashier|invoice|receipt|bill|total|sub\s*total|amount|qty|description|item|customer|table|server|doc)\b"
    ).unwrap();

    pub static ref EMAIL: Regex = Regex::new(
        r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"
    ).unwrap();

    pub static ref PHONE: Regex = Regex::new(
        r"(?:\+?\d{1,3}[\s\-]?)?\(?\d{2,4}\)?[\s\-]\d{3,4}[\s\-]?\d{3,4}"
    ).unwrap();

    // Line item rows
    pub static ref QUANTITY_PREFIX: Regex = Regex::new(
        r"(?i)^(\d{1,4})[ \t]*(?:x|@|pcs?|qty)?(?:[ \t]+|$)"
    ).unwrap();

    pub static ref INLINE_QUANTITY: Regex = Regex::new(
        r"(?i)\b(\d{1,4})[ \t]*(?:x|@)[ \t]*$"
    ).unwrap();
}
