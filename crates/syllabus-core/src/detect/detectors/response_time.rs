//! Instructor response-time detection.
//!
//! Candidates are only taken from windows around contact wording, must name
//! an explicit time span, and are rejected when the sentence is about
//! deadlines, support desks, course workload or a bare contact listing.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::detect::normalize::{collapse_whitespace, normalize};
use crate::detect::rules::library::RESPONSE_TIME_PATTERNS;
use crate::detect::rules::patterns::{sentence_spans, DEADLINE_TERM, DURATION_TERM, REPLY_VERB};
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::models::detection::{DetectionResult, FieldResult};

pub const FIELD: &str = "response_time";

const WINDOW_BEFORE: usize = 200;
const WINDOW_AFTER: usize = 800;

lazy_static! {
    static ref CONTACT_KEYWORD: Regex = Regex::new(
        r"\b(?:e-?mails?|contact|reach\s+me|respond|response|reply|replies|get\s+back\s+to|messages?|communication)\b"
    ).unwrap();

    static ref TIME_SPAN: Regex = Regex::new(
        r"\b((?:\d{1,2}|one|two|three|four|five|twenty[\s-]four|forty[\s-]eight|seventy[\s-]two)(?:\s*(?:-|to|or)\s*(?:\d{1,2}|two|three|four|forty[\s-]eight|seventy[\s-]two))?\s*(?:business\s+|working\s+|school\s+|week)?(?:hours?|hrs?|days?)|(?:the\s+)?next\s+(?:business\s+|working\s+|school\s+)?day|(?:the\s+)?same\s+(?:business\s+)?day)\b"
    ).unwrap();

    static ref OFFICE_HOURS: Regex = Regex::new(r"\boffice\s+hours?\b").unwrap();

    /// Reply wording stronger than a bare mention of email.
    static ref REPLY_CUE: Regex = Regex::new(
        r"\b(?:respond|responds|response|reply|replies|answer|get\s+back\s+to)\b"
    ).unwrap();

    static ref VAGUE: Regex = Regex::new(
        r"\b(?:promptly|as\s+soon\s+as\s+possible|asap|timely|quickly|in\s+a\s+reasonable\s+time)\b"
    ).unwrap();
}

/// Response-time detector.
pub struct ResponseTimeDetector;

impl ResponseTimeDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let normalized = normalize(text).normalized;
        if normalized.is_empty() {
            return None;
        }

        let mut best: Option<(u32, ExtractionMatch<String>)> = None;

        for (start, end) in contact_windows(&normalized) {
            let window = &normalized[start..end];
            for (s, e) in sentence_spans(window) {
                let sentence = window[s..e].trim();
                let Some((score, span)) = score_sentence(sentence) else {
                    continue;
                };

                trace!("response time candidate '{}' scored {}", span, score);
                if best.as_ref().is_none_or(|(b, _)| score > *b) {
                    let confidence = (0.5 + 0.08 * score as f32).min(0.95);
                    best = Some((
                        score,
                        ExtractionMatch::new(span, confidence, sentence)
                            .with_position(start + s, start + e),
                    ));
                }
            }
        }

        best.map(|(_, m)| m)
    }
}

/// Merged windows around contact keywords, as byte ranges.
fn contact_windows(text: &str) -> Vec<(usize, usize)> {
    let mut windows: Vec<(usize, usize)> = Vec::new();

    for m in CONTACT_KEYWORD.find_iter(text) {
        let start = floor_boundary(text, m.start().saturating_sub(WINDOW_BEFORE));
        let end = ceil_boundary(text, (m.end() + WINDOW_AFTER).min(text.len()));

        match windows.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => windows.push((start, end)),
        }
    }

    windows
}

/// Score one sentence, returning the cleaned time span if it qualifies.
fn score_sentence(sentence: &str) -> Option<(u32, String)> {
    let span = TIME_SPAN.captures(sentence)?;
    let value = collapse_whitespace(&span[1]);

    if VAGUE.is_match(sentence) && !value.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    if RESPONSE_TIME_PATTERNS.is_excluded(sentence) || DURATION_TERM.is_match(sentence) {
        return None;
    }
    if OFFICE_HOURS.is_match(sentence) && !REPLY_CUE.is_match(sentence) {
        return None;
    }
    if DEADLINE_TERM.is_match(sentence) && !REPLY_VERB.is_match(sentence) {
        return None;
    }
    if !REPLY_VERB.is_match(sentence) && !sentence.contains("response time") {
        return None;
    }

    let score: f32 = RESPONSE_TIME_PATTERNS
        .rules
        .iter()
        .filter(|rule| rule.pattern.is_match(sentence))
        .map(|rule| rule.weight)
        .sum();

    Some((score as u32, value))
}

fn floor_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

impl Default for ResponseTimeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for ResponseTimeDetector {
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

    fn extract(text: &str) -> Option<String> {
        ResponseTimeDetector::new().extract(text).map(|m| m.value)
    }

    #[test]
    fn test_within_hours() {
        let text = "Email: prof@school.edu\nI will respond to emails within 24 hours on weekdays.";
        assert_eq!(extract(text), Some("24 hours".to_string()));
    }

    #[test]
    fn test_range_and_response_time_label() {
        let text = "Communication\nResponse time: 24-48 hours (business days).";
        assert_eq!(extract(text), Some("24-48 hours".to_string()));
    }

    #[test]
    fn test_next_business_day() {
        let text = "Messages sent on Friday will receive a reply the next business day.";
        assert_eq!(extract(text), Some("the next business day".to_string()));
    }

    #[test]
    fn test_bare_contact_listing_not_found() {
        assert_eq!(extract("Email: prof@school.edu"), None);
    }

    #[test]
    fn test_deadline_sentence_rejected() {
        let text = "Contact me with questions. Assignments are due within 48 hours of release.";
        assert_eq!(extract(text), None);
    }

    #[test]
    fn test_workload_sentence_rejected() {
        let text = "Email me anytime. Expect to spend 6 hours per week on readings.";
        assert_eq!(extract(text), None);
    }

    #[test]
    fn test_support_desk_rejected() {
        let text = "Contact the IT help desk; they respond within 2 hours.";
        assert_eq!(extract(text), None);
    }

    #[test]
    fn test_office_hours_length_rejected() {
        let text = "Email me or attend office hours, which run 2 hours on Mondays.";
        assert_eq!(extract(text), None);
        assert!(!ResponseTimeDetector::new().detect(text).is_found());
    }

    #[test]
    fn test_lecture_length_rejected() {
        assert_eq!(extract("Email questions before class. Each lecture lasts 3 hours."), None);
    }

    #[test]
    fn test_reply_near_office_hours_kept() {
        let text = "I reply within 24 hours to questions raised outside office hours.";
        assert_eq!(extract(text), Some("24 hours".to_string()));
    }

    #[test]
    fn test_vague_promise_rejected() {
        assert_eq!(extract("I will reply to email promptly."), None);
    }
}
