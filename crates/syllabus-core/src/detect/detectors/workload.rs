//! Workload / engaged-time declarations.

use tracing::debug;

use crate::detect::normalize::collapse_whitespace;
use crate::detect::rules::library::{is_section_boundary, WORKLOAD_PATTERNS};
use crate::detect::rules::patterns::sentence_spans;
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::models::detection::{DetectionResult, FieldResult};

pub const FIELD: &str = "workload";

/// Longest sentence returned as-is; longer ones are cut to the match.
const MAX_SENTENCE_CHARS: usize = 400;

/// Workload detector.
pub struct WorkloadDetector;

impl WorkloadDetector {
    pub fn new() -> Self {
        Self
    }

    /// The earliest sentence declaring an expected time commitment.
    pub fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let collapsed = join_wrapped_lines(text);

        let earliest = WORKLOAD_PATTERNS
            .rule_matches(&collapsed)
            .into_iter()
            .min_by_key(|m| (m.start, std::cmp::Reverse(m.end)))?;
        debug!("workload rule '{}' at byte {}", earliest.rule.name, earliest.start);

        let (start, end) = sentence_spans(&collapsed)
            .into_iter()
            .find(|(s, e)| *s <= earliest.start && earliest.start < *e)
            .unwrap_or((earliest.start, earliest.end));

        let sentence = collapsed[start..end].trim();
        let content = if sentence.chars().count() <= MAX_SENTENCE_CHARS {
            sentence
        } else {
            earliest.text.trim()
        };

        Some(
            ExtractionMatch::new(content.to_string(), earliest.rule.weight.min(0.9), earliest.text)
                .with_position(earliest.start, earliest.end),
        )
    }
}

/// Rejoin lines wrapped mid-sentence while keeping headings and blank
/// lines as sentence breaks.
fn join_wrapped_lines(text: &str) -> String {
    let mut out = String::new();
    let mut pending_break = false;

    for line in text.lines() {
        let line = collapse_whitespace(line);
        if line.is_empty() {
            pending_break = true;
            continue;
        }

        if !out.is_empty() {
            out.push_str(if pending_break { "\n\n" } else { " " });
        }
        out.push_str(&line);
        pending_break = is_heading(&line);
    }

    out
}

fn is_heading(line: &str) -> bool {
    if line.ends_with(':') || is_section_boundary(line) {
        return true;
    }
    line.split_whitespace().count() <= 5
        && !line.ends_with(['.', ',', ';', '!', '?'])
        && line.chars().next().is_some_and(|c| c.is_uppercase())
}

impl Default for WorkloadDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for WorkloadDetector {
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
        WorkloadDetector::new().extract(text).map(|m| m.value)
    }

    #[test]
    fn test_engaged_time_sentence() {
        let text = "Course Workload\nThis course requires a minimum of 3 hours of engaged time\n\
                    per week per credit over a 15-week semester. Plan accordingly.";
        assert_eq!(
            extract(text),
            Some(
                "This course requires a minimum of 3 hours of engaged time per week per credit \
                 over a 15-week semester."
                    .to_string()
            )
        );
    }

    #[test]
    fn test_earliest_declaration_wins() {
        let text = "Students are expected to spend at least 9 hours on this class weekly. \
                    Credit hour policy: see the catalog.";
        let value = extract(text).unwrap();
        assert!(value.starts_with("Students are expected to spend"));
    }

    #[test]
    fn test_no_declaration() {
        assert_eq!(extract("Office hours are Monday 2-4 pm."), None);
        assert_eq!(extract(""), None);
    }
}
