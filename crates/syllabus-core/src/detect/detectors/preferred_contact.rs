//! Preferred contact method.

use lazy_static::lazy_static;
use regex::Regex;

use crate::detect::rules::library::PREFERRED_CONTACT_PATTERNS;
use crate::detect::sections::split_lines;
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::models::detection::{DetectionResult, FieldResult};

pub const FIELD: &str = "preferred_contact";

lazy_static! {
    static ref PREFERENCE: Regex = Regex::new(
        r"(?i)\b(?:preferred\s+(?:method\s+of\s+)?contact|best\s+way\s+to\s+(?:contact|reach)|please\s+reach\s+out\s+(?:via|by)|contact\s+me\s+(?:by|via|through)|reach\s+out\s+via|should\s+contact|(?:e-?mail|phone)\s+is\s+the\s+best|prefer(?:red)?\s+(?:that\s+you\s+)?(?:e-?mail|call|contact|message)|check\s+my\s+e-?mail)"
    ).unwrap();
}

/// Preferred contact method detector.
pub struct PreferredContactDetector;

impl PreferredContactDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines = split_lines(text);

        for (i, line) in lines.iter().enumerate() {
            if !PREFERENCE.is_match(line) && !PREFERRED_CONTACT_PATTERNS.is_header(line) {
                continue;
            }
            if PREFERRED_CONTACT_PATTERNS.is_excluded(line) {
                continue;
            }

            // A bare heading names the method on the following line.
            let candidates = std::iter::once(*line).chain(
                lines
                    .iter()
                    .skip(i + 1)
                    .copied()
                    .filter(|l| !l.trim().is_empty())
                    .take(1),
            );
            for candidate in candidates {
                if let Some(m) = PREFERRED_CONTACT_PATTERNS.first_rule_match(candidate) {
                    return Some(ExtractionMatch::new(m.rule.name.to_string(), 0.85, candidate.trim()));
                }
            }
        }

        PREFERRED_CONTACT_PATTERNS
            .rules
            .iter()
            .find(|rule| rule.pattern.is_match(text))
            .map(|rule| ExtractionMatch::new(rule.name.to_string(), 0.4, "document"))
    }
}

impl Default for PreferredContactDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for PreferredContactDetector {
    fn field_name(&self) -> &'static str {
        FIELD
    }

    fn detect(&self, text: &str) -> DetectionResult {
        FieldResult::from_option(FIELD, self.extract(text).map(ExtractionMatch::into_scored)).into()
    }
}
