//! Student learning outcome detection.
//!
//! Strictly header-driven: a casual mention of "learning outcomes" in prose
//! never counts. Content is the list that follows the header.

use tracing::debug;

use crate::detect::rules::library::SLO_PATTERNS;
use crate::detect::sections::{capture_section, split_lines, HeaderMatcher, SpanLimits};
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::error::DetectorError;
use crate::models::detection::{DetectionResult, FieldResult};

pub const FIELD: &str = "slo";

const LIMITS: SpanLimits = SpanLimits::new(15, 1500);

/// Learning-outcome section detector.
pub struct SloDetector {
    headers: HeaderMatcher,
}

impl SloDetector {
    /// Create a new SLO detector with the built-in section titles.
    pub fn new() -> Self {
        Self {
            headers: HeaderMatcher::new(&SLO_PATTERNS, &[]),
        }
    }

    /// Create a detector that also accepts the given section titles.
    pub fn with_extra_headers(extra: &[String]) -> Result<Self, DetectorError> {
        if let Some(blank) = extra.iter().find(|h| h.trim().is_empty()) {
            return Err(DetectorError::Unavailable {
                field: FIELD.to_string(),
                reason: format!("invalid extra header {:?}", blank),
            });
        }

        Ok(Self {
            headers: HeaderMatcher::new(&SLO_PATTERNS, extra),
        })
    }

    fn find(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines = split_lines(text);

        for hit in self.headers.find_all(&lines) {
            let mut items = Vec::new();
            if let Some(inline) = &hit.inline {
                items.push(inline.clone());
            }
            items.extend(capture_section(&lines, hit.line, LIMITS));

            if items.is_empty() {
                debug!("SLO header at line {} has no content", hit.line + 1);
                continue;
            }

            let confidence = if hit.inline.is_some() { 0.85 } else { 0.95 };
            return Some(ExtractionMatch::new(items.join("\n"), confidence, hit.text));
        }

        None
    }
}

impl Default for SloDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for SloDetector {
    fn field_name(&self) -> &'static str {
        FIELD
    }

    fn detect(&self, text: &str) -> DetectionResult {
        FieldResult::from_option(FIELD, self.find(text).map(ExtractionMatch::into_scored)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn content(text: &str) -> String {
        SloDetector::new().detect(text).content()
    }

    #[test]
    fn test_header_with_bullets() {
        let text = "Course Description\nAn intro course.\n\nStudent Learning Outcomes:\n\
                    • Describe the structure of cells.\n\
                    • Interpret experimental data.\n\
                    • Communicate findings in writing.\n\nGrading\nExams 40%";
        let result = SloDetector::new().detect(text);
        assert!(result.is_found());
        assert_eq!(
            result.content(),
            "Describe the structure of cells.\nInterpret experimental data.\nCommunicate findings in writing."
        );
    }

    #[test]
    fn test_casual_mention_is_not_found() {
        let result = SloDetector::new().detect("SLOs are important for course design.");
        assert!(!result.is_found());
        assert_eq!(result.content(), "");
    }

    #[test]
    fn test_inline_header() {
        assert_eq!(
            content("Learning Outcomes: Students will be able to write SQL queries."),
            "Students will be able to write SQL queries."
        );
    }

    #[test]
    fn test_empty_header_is_skipped() {
        let text = "Learning Outcomes\nGrading\nExams 50%\n\nCourse Objectives\n1. Build parsers.";
        assert_eq!(content(text), "Build parsers.");
    }

    #[test]
    fn test_extra_headers() {
        let detector = SloDetector::with_extra_headers(&["Course Goals".to_string()]).unwrap();
        assert!(detector.detect("Course Goals\n- Learn Rust").is_found());
        assert!(SloDetector::with_extra_headers(&["  ".to_string()]).is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(!SloDetector::new().detect("").is_found());
    }
}
