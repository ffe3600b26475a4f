//! Date extraction for receipts and invoices.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, DATE_LABEL, DATE_TEXT_DMY, DATE_TEXT_MDY, DATE_YMD};
use super::{assign_label_distances, label_spans, previous_word, FieldCandidate, FieldExtractor};

/// Words that turn a `date` label into something other than the document date.
const IGNORED_DATE_QUALIFIERS: &[&str] = &["due", "expiry", "exp", "delivery", "valid"];

/// Date field extractor.
pub struct DateExtractor {
    day_first: bool,
    label_window: usize,
}

impl DateExtractor {
    pub fn new() -> Self {
        Self {
            day_first: true,
            label_window: 40,
        }
    }

    /// Read ambiguous numeric dates as day/month (`true`) or month/day.
    pub fn with_day_first(mut self, day_first: bool) -> Self {
        self.day_first = day_first;
        self
    }

    /// Set the maximum label-to-value distance.
    pub fn with_label_window(mut self, window: usize) -> Self {
        self.label_window = window;
        self
    }

    fn push(
        &self,
        results: &mut Vec<FieldCandidate<NaiveDate>>,
        date: NaiveDate,
        confidence: f32,
        m: regex::Match<'_>,
    ) {
        if results.iter().any(|r| overlaps(r.position, m.start(), m.end())) {
            return;
        }
        results.push(FieldCandidate::new(date, confidence, m.as_str()).with_position(m.start(), m.end()));
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = NaiveDate;

    fn extract_all(&self, text: &str) -> Vec<FieldCandidate<NaiveDate>> {
        let mut results = Vec::new();
        let labels = label_spans(text, &DATE_LABEL, |text, start, _| {
            !IGNORED_DATE_QUALIFIERS.contains(&previous_word(text, start).as_str())
        });

        // YYYY-MM-DD first so its digits are not read as DD-MM-YY.
        for caps in DATE_YMD.captures_iter(text) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);

            if let (Some(date), Some(m)) = (NaiveDate::from_ymd_opt(year, month, day), caps.get(0)) {
                self.push(&mut results, date, 0.9, m);
            }
        }

        // DD/MM/YYYY, DD-MM-YY, DD.MM.YYYY
        for caps in DATE_DMY.captures_iter(text) {
            let first: u32 = caps[1].parse().unwrap_or(0);
            let second: u32 = caps[2].parse().unwrap_or(0);
            let year = parse_year(&caps[3]);

            let ambiguous = first <= 12 && second <= 12 && first != second;
            let confidence = if ambiguous { 0.8 } else { 0.9 };

            if let (Some(date), Some(m)) = (resolve_numeric(first, second, year, self.day_first), caps.get(0)) {
                self.push(&mut results, date, confidence, m);
            }
        }

        // 15 Jan 2019
        for caps in DATE_TEXT_DMY.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month = month_to_number(&caps[2]);
            let year = parse_year(&caps[3]);

            if let (Some(date), Some(m)) = (NaiveDate::from_ymd_opt(year, month, day), caps.get(0)) {
                self.push(&mut results, date, 0.95, m);
            }
        }

        // January 15, 2019
        for caps in DATE_TEXT_MDY.captures_iter(text) {
            let month = month_to_number(&caps[1]);
            let day: u32 = caps[2].parse().unwrap_or(0);
            let year = parse_year(&caps[3]);

            if let (Some(date), Some(m)) = (NaiveDate::from_ymd_opt(year, month, day), caps.get(0)) {
                self.push(&mut results, date, 0.95, m);
            }
        }

        results.sort_by_key(|r| r.start());
        assign_label_distances(&mut results, &labels, self.label_window);
        dedup_dates(results)
    }
}

/// Collapse repeated dates, keeping the first and its closest label.
fn dedup_dates(candidates: Vec<FieldCandidate<NaiveDate>>) -> Vec<FieldCandidate<NaiveDate>> {
    let mut unique: Vec<FieldCandidate<NaiveDate>> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        match unique.iter_mut().find(|u| u.value == candidate.value) {
            Some(existing) => {
                existing.label_distance = match (existing.label_distance, candidate.label_distance) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
            }
            None => unique.push(candidate),
        }
    }

    unique
}

fn overlaps(position: Option<(usize, usize)>, start: usize, end: usize) -> bool {
    position.is_some_and(|(s, e)| start < e && s < end)
}

/// Resolve a numeric `a/b/year` date.
///
/// A component above 12 can only be the day; otherwise `day_first` decides.
fn resolve_numeric(a: u32, b: u32, year: i32, day_first: bool) -> Option<NaiveDate> {
    let (day, month) = if a > 12 {
        (a, b)
    } else if b > 12 || !day_first {
        (b, a)
    } else {
        (a, b)
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Format a date as `DD/MM/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}

fn month_to_number(month: &str) -> u32 {
    match month.to_lowercase().get(..3).unwrap_or("") {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => 0,
    }
}
