//! OCR text cleanup applied before field extraction.

use crate::models::config::NormalizerConfig;

/// Pure string normalizer.
///
/// Normalizing already-normalized text returns it unchanged.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Clean raw OCR text.
    pub fn normalize(&self, text: &str) -> String {
        let text = if self.config.normalize_whitespace {
            normalize_whitespace(text)
        } else {
            text.to_string()
        };

        if self.config.fix_numeric_confusions {
            fix_numeric_confusions(&text)
        } else {
            text
        }
    }
}

/// Unify line endings and spaces, trim lines and squeeze blank lines.
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    for line in unified.split('\n') {
        let collapsed = line
            .split(|c: char| c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if collapsed.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(collapsed);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// Digit a glyph is commonly misread from.
fn confusion_digit(c: char) -> Option<char> {
    match c {
        'O' | 'o' => Some('0'),
        'I' | 'l' | '|' => Some('1'),
        'S' => Some('5'),
        'B' => Some('8'),
        _ => None,
    }
}

fn is_separator(c: char) -> bool {
    c == '.' || c == ','
}

/// Replace confusable glyphs inside number-like words.
///
/// A whitespace-delimited word qualifies when, after an optional prefix of
/// plain letters or symbols (`RM`, `$`), it holds only digits, decimal
/// separators and confusable glyphs, with at least as many digits as
/// glyphs. Words like `SDN BHD` or `B2B` are never touched. Qualifying
/// words come out with no confusable glyph left, which keeps the pass
/// idempotent.
pub fn fix_numeric_confusions(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            out.push_str(&fix_word(&word));
            word.clear();
            out.push(c);
        } else {
            word.push(c);
        }
    }
    out.push_str(&fix_word(&word));

    out
}

fn fix_word(word: &str) -> String {
    let prefix_len: usize = word
        .chars()
        .take_while(|&c| !c.is_ascii_digit() && !is_separator(c) && confusion_digit(c).is_none())
        .map(char::len_utf8)
        .sum();
    let (prefix, body) = word.split_at(prefix_len);

    let digits = body.chars().filter(|c| c.is_ascii_digit()).count();
    let glyphs = body.chars().filter(|&c| confusion_digit(c).is_some()).count();
    let number_like = body
        .chars()
        .all(|c| c.is_ascii_digit() || is_separator(c) || confusion_digit(c).is_some());

    if glyphs == 0 || digits == 0 || glyphs > digits || !number_like {
        return word.to_string();
    }

    let mut fixed = String::with_capacity(word.len());
    fixed.push_str(prefix);
    fixed.extend(body.chars().map(|c| confusion_digit(c).unwrap_or(c)));
    fixed
}
