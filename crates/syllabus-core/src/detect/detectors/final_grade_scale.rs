//! Final grade scale detection.
//!
//! Three passes, strongest first: an A..F letter block, a window of
//! percent or points lines with its heading, then any cluster of percent
//! lines.

use lazy_static::lazy_static;
use regex::Regex;

use crate::detect::rules::patterns::GRADE_SCALE_HEADING;
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::models::detection::{DetectionResult, FieldResult};

pub const FIELD: &str = "final_grade_scale";

/// Lines searched above a block for its heading.
const HEADING_LOOKBACK: usize = 6;
/// Lines a block may be extended by after its last scored line.
const TRAILING_LINES: usize = 8;
/// Sentence-like lines longer than this end a trailing extension.
const MAX_TRAILING_WORDS: usize = 20;

const ANCHOR_KEYWORDS: &[&str] = &[
    "grade",
    "grading",
    "assignment",
    "exam",
    "quiz",
    "project",
    "total = 100",
    "total=100",
    "total 100",
    "total: 100",
    "total - 100",
];

lazy_static! {
    static ref LETTER_BLOCK: Regex = Regex::new(
        r"(?s)\bA\s*[:\-=].{0,80}?\bB\s*[:\-=].{0,80}?\bC\s*[:\-=].{0,80}?\bD\s*[:\-=].{0,80}?\bF\s*[:\-=]?"
    ).unwrap();

    static ref PERCENT: Regex = Regex::new(r"\d+\s*%").unwrap();

    static ref POINTS: Regex = Regex::new(r"(?i)\b\d+\s*(?:points|pts)\b").unwrap();

    static ref ITEM_WITH_WEIGHT: Regex = Regex::new(
        r"(?i)^[a-z].{0,60}(?:\d+\s*%|\(\d+%\)|\d+\s*points|\d+\s*pts)"
    ).unwrap();
}

/// Final grade scale detector.
pub struct FinalGradeScaleDetector;

impl FinalGradeScaleDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        if lines.iter().all(|l| l.trim().is_empty()) {
            return None;
        }

        letter_block(&lines)
            .map(|content| ExtractionMatch::new(content, 0.9, "letter block"))
            .or_else(|| weighted_window(&lines).map(|c| ExtractionMatch::new(c, 0.75, "weighted window")))
            .or_else(|| percent_cluster(&lines).map(|c| ExtractionMatch::new(c, 0.6, "percent cluster")))
    }
}

/// Letter block expanded to the full lines it spans.
fn letter_block(lines: &[&str]) -> Option<String> {
    let joined = lines.join("\n");
    let m = LETTER_BLOCK.find(&joined)?;

    let start = joined[..m.start()].rfind('\n').map_or(0, |i| i + 1);
    let end = joined[m.end()..].find('\n').map_or(joined.len(), |i| m.end() + i);

    let content = joined[start..end].trim();
    (!content.is_empty()).then(|| content.to_string())
}

fn is_scored(line: &str) -> bool {
    PERCENT.is_match(line) || POINTS.is_match(line)
}

fn has_anchor(text: &str) -> bool {
    let lower = text.to_lowercase();
    ANCHOR_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Runs of consecutive weight-like lines, as (first line, length).
fn blocks(lines: &[&str]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;

    for (i, line) in lines.iter().enumerate() {
        let s = line.trim();
        let member = !s.is_empty() && (is_scored(s) || ITEM_WITH_WEIGHT.is_match(s));
        match (member, start) {
            (true, None) => start = Some(i),
            (false, Some(st)) => {
                out.push((st, i - st));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(st) = start {
        out.push((st, lines.len() - st));
    }

    out
}

fn weighted_window(lines: &[&str]) -> Option<String> {
    let mut best: Option<(usize, usize, usize)> = None;

    for (start, len) in blocks(lines) {
        let mut score = lines[start..start + len].iter().filter(|l| is_scored(l)).count();
        let context = lines[start.saturating_sub(3)..(start + len + 3).min(lines.len())].join(" ");
        if has_anchor(&context) {
            score += 1;
        }
        if score >= 2 && best.is_none_or(|(s, _, _)| score > s) {
            best = Some((score, start, len));
        }
    }

    let (_, start, len) = best?;
    let first = heading_above(lines, start).unwrap_or(start);

    let mut last = start + len - 1;
    for (j, line) in lines.iter().enumerate().skip(last + 1).take(TRAILING_LINES) {
        let s = line.trim();
        if s.is_empty() || (s.contains('.') && s.split_whitespace().count() > MAX_TRAILING_WORDS) {
            break;
        }
        last = j;
    }

    Some(join_nonempty(&lines[first..=last]))
}

fn heading_above(lines: &[&str], start: usize) -> Option<usize> {
    (start.saturating_sub(HEADING_LOOKBACK)..start)
        .rev()
        .take_while(|&i| !lines[i].trim().is_empty())
        .find(|&i| is_heading_line(lines[i]))
}

fn is_heading_line(line: &str) -> bool {
    let s = line.trim();
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.is_empty() {
        return false;
    }

    if !s.chars().any(|c| c.is_lowercase()) && words.len() <= 12 {
        return true;
    }
    if (GRADE_SCALE_HEADING.is_match(s) || has_anchor(s)) && words.len() <= 15 {
        return true;
    }

    let capitalized = words.iter().filter(|w| w.starts_with(char::is_uppercase)).count();
    capitalized >= 2 && words.len() <= 10 && !s.contains(['.', ','])
}

fn percent_cluster(lines: &[&str]) -> Option<String> {
    for (idx, _) in lines.iter().enumerate().filter(|(_, l)| PERCENT.is_match(l)) {
        let start = idx.saturating_sub(3);
        let end = (idx + 4).min(lines.len());

        let hits = lines[start..end].iter().filter(|l| PERCENT.is_match(l)).count();
        if hits < 2 {
            continue;
        }

        let first = (start.saturating_sub(8)..start)
            .rev()
            .take_while(|&i| !lines[i].trim().is_empty())
            .find(|&i| has_anchor(lines[i]) || !lines[i].chars().any(|c| c.is_lowercase()))
            .unwrap_or(start);

        let mut last = end - 1;
        for (j, line) in lines.iter().enumerate().skip(end).take(TRAILING_LINES) {
            if line.trim().is_empty() {
                break;
            }
            last = j;
        }

        return Some(join_nonempty(&lines[first..=last]));
    }

    None
}

fn join_nonempty(lines: &[&str]) -> String {
    lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

impl Default for FinalGradeScaleDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for FinalGradeScaleDetector {
    fn field_name(&self) -> &'static str {
        FIELD
    }

    fn detect(&self, text: &str) -> DetectionResult {
        FieldResult::from_option(FIELD, self.extract(text).map(ExtractionMatch::into_scored)).into()
    }
}
