//! Instructor email detection.

use crate::detect::rules::library::EMAIL_PATTERNS;
use crate::detect::rules::patterns::EMAIL;
use crate::detect::sections::split_lines;
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::models::detection::{DetectionResult, FieldResult};

pub const FIELD: &str = "email";

/// Only the top of the document is searched for labelled addresses.
const LABELLED_SEARCH_LINES: usize = 150;

/// Instructor email detector.
pub struct EmailDetector;

impl EmailDetector {
    pub fn new() -> Self {
        Self
    }

    /// All personal addresses in the text, in order, without duplicates.
    pub fn extract_all(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        let lines = split_lines(text);
        let mut results: Vec<ExtractionMatch<String>> = Vec::new();
        let mut offset = 0;

        for (i, line) in lines.iter().enumerate() {
            for m in EMAIL.find_iter(line) {
                let address = m.as_str().trim_end_matches('.').to_string();
                if EMAIL_PATTERNS.is_excluded(&address)
                    || results.iter().any(|r| r.value.eq_ignore_ascii_case(&address))
                {
                    continue;
                }

                let labelled = i < LABELLED_SEARCH_LINES
                    && (EMAIL_PATTERNS.best_rule_match(line).is_some()
                        || previous_line_is_label(&lines, i));
                let confidence = if labelled { 0.95 } else { 0.75 };

                results.push(
                    ExtractionMatch::new(address, confidence, *line)
                        .with_position(offset + m.start(), offset + m.end()),
                );
            }
            offset += line.len() + 1;
        }

        results
    }

    pub fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let all = self.extract_all(text);
        let labelled = all.iter().position(|m| m.confidence >= 0.9);
        match labelled {
            Some(idx) => all.into_iter().nth(idx),
            None => all.into_iter().next(),
        }
    }
}

fn previous_line_is_label(lines: &[&str], idx: usize) -> bool {
    idx > 0 && {
        let prev = lines[idx - 1].trim();
        prev.len() < 40 && EMAIL_PATTERNS.best_rule_match(prev).is_some()
    }
}

impl Default for EmailDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for EmailDetector {
    fn field_name(&self) -> &'static str {
        FIELD
    }

    fn detect(&self, text: &str) -> DetectionResult {
        FieldResult::from_option(FIELD, self.extract(text).map(ExtractionMatch::into_scored)).into()
    }
}

/// Extract the instructor email from text.
pub fn extract_email(text: &str) -> Option<String> {
    EmailDetector::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_email_preferred() {
        let text = "Questions? Visit help@lib.unh.edu.\nInstructor: Dr. Ana Ruiz\nEmail: ana.ruiz@unh.edu";
        assert_eq!(extract_email(text), Some("ana.ruiz@unh.edu".to_string()));
    }

    #[test]
    fn test_service_mailbox_skipped() {
        let text = "For IT problems write to helpdesk@unh.edu.";
        assert_eq!(extract_email(text), None);
    }

    #[test]
    fn test_unlabelled_fallback() {
        let text = "Reach me at j.doe@college.edu if needed.";
        let m = EmailDetector::new().extract(text).unwrap();
        assert_eq!(m.value, "j.doe@college.edu");
        assert!(m.confidence < 0.9);
    }

    #[test]
    fn test_label_on_previous_line() {
        let text = "Contact\nsam.lee@school.edu";
        let m = EmailDetector::new().extract(text).unwrap();
        assert_eq!(m.confidence, 0.95);
    }

    #[test]
    fn test_not_found() {
        assert!(!EmailDetector::new().detect("No contact details here.").is_found());
    }
}
