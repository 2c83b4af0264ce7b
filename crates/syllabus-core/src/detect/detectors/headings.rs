//! Section-title detectors.
//!
//! These fields are the heading line itself, e.g. "Assignments" or
//! "Grading Policy". A line qualifies when its header key matches one of
//! the field's anchored rules.

use crate::detect::rules::library::{
    header_key, FieldPatterns, ASSIGNMENT_TYPES_PATTERNS, GRADING_PROCEDURES_PATTERNS,
};
use crate::detect::sections::split_lines;
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::models::detection::{DetectionResult, FieldResult};

pub const ASSIGNMENT_TYPES: &str = "assignment_types_title";
pub const GRADING_PROCEDURES: &str = "grading_procedures_title";

const MIN_LINE: usize = 3;
const MAX_LINE: usize = 200;

/// Detects a section heading by anchored title rules.
pub struct HeadingDetector {
    field: &'static str,
    patterns: &'static FieldPatterns,
}

impl HeadingDetector {
    pub fn new(field: &'static str, patterns: &'static FieldPatterns) -> Self {
        Self { field, patterns }
    }

    pub fn assignment_types() -> Self {
        Self::new(ASSIGNMENT_TYPES, &ASSIGNMENT_TYPES_PATTERNS)
    }

    pub fn grading_procedures() -> Self {
        Self::new(GRADING_PROCEDURES, &GRADING_PROCEDURES_PATTERNS)
    }

    /// First line, in document order, that is one of the field's titles.
    pub fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        for (i, line) in split_lines(text).into_iter().enumerate() {
            let trimmed = line.trim();
            let len = trimmed.chars().count();
            if !(MIN_LINE..=MAX_LINE).contains(&len) {
                continue;
            }

            let key = header_key(trimmed);
            if let Some(m) = self.patterns.first_rule_match(&key) {
                return Some(
                    ExtractionMatch::new(trimmed.to_string(), 0.9 * m.rule.weight, trimmed)
                        .with_position(i, i + 1),
                );
            }
        }

        None
    }
}

impl FieldDetector for HeadingDetector {
    fn field_name(&self) -> &'static str {
        self.field
    }

    fn detect(&self, text: &str) -> DetectionResult {
        FieldResult::from_option(self.field, self.extract(text).map(ExtractionMatch::into_scored)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_types_title() {
        let text = "Course Description\nStudy of cells.\n\nCourse Assignments:\n- Lab reports 30%";
        let result = HeadingDetector::assignment_types().detect(text);
        assert_eq!(result.content(), "Course Assignments:");
    }

    #[test]
    fn test_grading_title_keeps_original_text() {
        let text = "3. GRADING POLICY\nExams 60%";
        let result = HeadingDetector::grading_procedures().detect(text);
        assert_eq!(result.content(), "3. GRADING POLICY");
        assert_eq!(result.field_name(), GRADING_PROCEDURES);
    }

    #[test]
    fn test_prose_is_not_a_title() {
        let text = "Assignments are due on Fridays.\nGrading is based on effort.";
        assert!(!HeadingDetector::assignment_types().detect(text).is_found());
        assert!(!HeadingDetector::grading_procedures().detect(text).is_found());
    }
}
