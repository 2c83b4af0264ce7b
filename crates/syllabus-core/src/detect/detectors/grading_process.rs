//! How the course grade is computed: weighted components and points tables.
//!
//! Letter-grade scales belong to `final_grade_scale` and are excluded here.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::detect::rules::library::GRADING_PROCESS_PATTERNS;
use crate::detect::rules::patterns::{GRADE_SCALE_HEADING, WEIGHTED_COMPONENT};
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::models::detection::{DetectionResult, FieldResult};

pub const FIELD: &str = "grading_process";

/// Blank or unrelated lines tolerated inside a component cluster.
const MAX_GAP: usize = 2;
const MIN_COMPONENTS: usize = 2;
const HEADING_LOOKBACK: usize = 8;
const TABLE_LOOKAHEAD: usize = 10;
const MAX_ROW_WORDS: usize = 20;

lazy_static! {
    static ref TABLE_HEADER: Regex = Regex::new(
        r"(?i)\b(?:grade|assignment|points|category|weight|breakdown)\b.*\b(?:points|pts)\b|\b(?:points|pts)\b.*\b(?:grade|assignment|category|weight|breakdown)\b"
    ).unwrap();

    static ref TABLE_ROW: Regex = Regex::new(
        r"(?i)\b\d+\s*(?:points?|pts)\b|\d+\s*[×x@]\s*\d+"
    ).unwrap();

    static ref TOTAL_LINE: Regex = Regex::new(r"(?i)^\s*total\b").unwrap();
}

/// Grading process detector.
pub struct GradingProcessDetector;

impl GradingProcessDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();

        points_table(&lines)
            .map(|content| ExtractionMatch::new(content, 0.8, "points table"))
            .or_else(|| component_cluster(&lines))
    }
}

fn points_table(lines: &[&str]) -> Option<String> {
    let mut best: Option<(usize, Vec<String>)> = None;

    for (i, line) in lines.iter().enumerate() {
        let head = line.trim();
        if head.is_empty() || !TABLE_HEADER.is_match(head) {
            continue;
        }

        let mut rows = vec![head.to_string()];
        for next in lines.iter().skip(i + 1).take(TABLE_LOOKAHEAD - 1) {
            let next = next.trim();
            if next.is_empty() {
                continue;
            }
            if next.split_whitespace().count() > MAX_ROW_WORDS {
                break;
            }
            if TABLE_ROW.is_match(next) {
                rows.push(next.to_string());
            } else if rows.len() > 1 {
                break;
            }
        }

        let data_rows = rows.len() - 1;
        if data_rows >= MIN_COMPONENTS && best.as_ref().is_none_or(|(n, _)| data_rows > *n) {
            let mut content = Vec::new();
            if let Some(h) = heading_above(lines, i) {
                content.push(h.to_string());
            }
            content.extend(rows);
            best = Some((data_rows, content));
        }
    }

    best.map(|(_, rows)| rows.join("\n"))
}

fn is_component(line: &str) -> bool {
    WEIGHTED_COMPONENT.is_match(line) && !GRADING_PROCESS_PATTERNS.is_excluded(line)
}

/// Densest run of weighted component lines plus the heading above it.
fn component_cluster(lines: &[&str]) -> Option<ExtractionMatch<String>> {
    let mut clusters: Vec<(usize, usize, usize)> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !is_component(line) {
            continue;
        }
        match clusters.last_mut() {
            Some((_, last, count)) if i - *last <= MAX_GAP + 1 => {
                *last = i;
                *count += 1;
            }
            _ => clusters.push((i, i, 1)),
        }
    }

    let (first, mut last, count) = clusters
        .into_iter()
        .filter(|(_, _, count)| *count >= MIN_COMPONENTS)
        .max_by_key(|(first, _, count)| (*count, std::cmp::Reverse(*first)))?;
    debug!("grading component cluster at lines {}..={} ({} components)", first + 1, last + 1, count);

    if lines.get(last + 1).is_some_and(|l| TOTAL_LINE.is_match(l)) {
        last += 1;
    }

    let heading = heading_above(lines, first);
    let mut content: Vec<&str> = heading.into_iter().collect();
    content.extend(lines[first..=last].iter().map(|l| l.trim()).filter(|l| !l.is_empty()));

    let confidence = if heading.is_some() { 0.85 } else { 0.75 };
    Some(ExtractionMatch::new(content.join("\n"), confidence, lines[first].trim()).with_position(first, last + 1))
}

/// Short heading within a few lines above `start`.
fn heading_above<'a>(lines: &[&'a str], start: usize) -> Option<&'a str> {
    (start.saturating_sub(HEADING_LOOKBACK)..start)
        .rev()
        .map(|i| lines[i].trim())
        .filter(|l| !l.is_empty())
        .find(|l| is_heading(l))
}

fn is_heading(line: &str) -> bool {
    let words = line.split_whitespace().count();
    if GRADING_PROCESS_PATTERNS.is_header(line) {
        return true;
    }
    if GRADE_SCALE_HEADING.is_match(line) && words <= 8 {
        return true;
    }
    words <= 8
        && line.chars().any(|c| c.is_alphabetic())
        && !line.chars().any(|c| c.is_lowercase())
        && !WEIGHTED_COMPONENT.is_match(line)
}

impl Default for GradingProcessDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for GradingProcessDetector {
    fn field_name(&self) -> &'static str {
        FIELD
    }

    fn detect(&self, text: &str) -> DetectionResult {
        FieldResult::from_option(FIELD, self.extract(text).map(ExtractionMatch::into_scored)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(text: &str) -> Option<String> {
        GradingProcessDetector::new().extract(text).map(|m| m.value)
    }

    #[test]
    fn test_weighted_components_with_heading() {
        let text = "Grading Policy:\n\
                    Exam 1 - 22%\n\
                    Exam 2 - 22%\n\
                    Online Quizzes - 10%\n\
                    Attendance - 4%\n\
                    Total = 100%\n\
                    \n\
                    Academic Integrity";
        assert_eq!(
            extract(text),
            Some("Grading Policy:\nExam 1 - 22%\nExam 2 - 22%\nOnline Quizzes - 10%\nAttendance - 4%\nTotal = 100%".to_string())
        );
    }

    #[test]
    fn test_letter_scale_is_not_a_process() {
        let text = "A = 93%\nB = 83%\nC = 73%\nD = 63%";
        assert_eq!(extract(text), None);
    }

    #[test]
    fn test_points_table() {
        let text = "Assignment Category   Points\nHomework   100 points\nMidterm   150 points\nFinal   200 points";
        assert_eq!(
            extract(text),
            Some("Assignment Category   Points\nHomework   100 points\nMidterm   150 points\nFinal   200 points".to_string())
        );
    }

    #[test]
    fn test_single_component_not_enough() {
        assert_eq!(extract("Participation counts for 10% of your grade."), None);
    }
}
