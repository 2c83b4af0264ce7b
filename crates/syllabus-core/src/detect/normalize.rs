//! Text normalization for matching.
//!
//! Matching happens on a lower-cased, whitespace-collapsed copy of the text;
//! extracted content is always taken from the original so it keeps its line
//! breaks and casing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    static ref LIST_MARKER: Regex = Regex::new(
        r"^\s*(?:[•\-*▪◦‣●○■□➢➤►–—·]+|\(?\d{1,2}[.)]|\(?[a-zA-Z][.)]|[ivxIVX]{1,4}[.)])\s+"
    ).unwrap();
}

/// A document in both matching and extraction forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Text for matching: lower-cased, punctuation mapped, whitespace collapsed.
    pub normalized: String,
    /// Input text with line breaks preserved.
    pub original: String,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Normalize raw document text.
pub fn normalize(raw: &str) -> NormalizedText {
    NormalizedText {
        normalized: collapse_whitespace(&fold_line(raw)),
        original: raw.replace("\r\n", "\n").replace('\r', "\n"),
    }
}

/// Normalize a single line for header comparison.
pub fn normalize_line(line: &str) -> String {
    collapse_whitespace(&fold_line(line))
}

/// Collapse all whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Strip leading bullets and list numbering from a line.
pub fn clean_list_item(line: &str) -> String {
    LIST_MARKER.replace(line, "").trim().to_string()
}

/// True if the line starts with a bullet or a list number.
pub fn is_list_item(line: &str) -> bool {
    LIST_MARKER.is_match(line)
}

/// Truncate on a character boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn fold_line(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{FF1A}' => ':',
            '\u{00A0}' | '\u{2007}' | '\u{202F}' => ' ',
            '\u{2022}' | '\u{25AA}' | '\u{25E6}' | '\u{2023}' | '\u{25CF}' => '*',
            _ => c,
        })
        .flat_map(char::to_lowercase)
        .collect()
}
