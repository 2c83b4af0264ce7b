//! Tiered phone contact detection.
//!
//! Tier 1 is an explicit number, tier 2 an availability phrase without a
//! number, tier 3 a bare mention near contact wording. The highest tier that
//! matches anywhere in the document wins.

use std::fmt;

use tracing::trace;

use crate::detect::rules::library::PHONE_PATTERNS;
use crate::detect::rules::patterns::{
    digit_count, CONTACT_INTENT, DEVICE_POLICY, PHONE_CONTACT_CONTEXT, PHONE_LABEL,
    PHONE_MENTION, PHONE_NUMBER_10, PHONE_NUMBER_7, SUPPORT_LINE,
};
use crate::detect::sections::split_lines;
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::models::detection::{DetectionResult, FieldResult};

pub const FIELD: &str = "phone";

/// Content reported for a tier-3 match.
pub const MENTIONED_UNCLEAR: &str = "Phone mentioned, details unclear";

/// Window around a bare mention searched for contact wording.
const INTENT_WINDOW: usize = 80;

/// Phone evidence tier, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhoneTier {
    Number = 1,
    Availability = 2,
    Mention = 3,
}

impl PhoneTier {
    fn confidence(self) -> f32 {
        match self {
            PhoneTier::Number => 0.95,
            PhoneTier::Availability => 0.75,
            PhoneTier::Mention => 0.4,
        }
    }
}

impl fmt::Display for PhoneTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tier {}", *self as u8)
    }
}

/// A phone match with its tier.
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneMatch {
    pub tier: PhoneTier,
    pub content: String,
}

/// Phone contact detector.
pub struct PhoneDetector;

impl PhoneDetector {
    pub fn new() -> Self {
        Self
    }

    /// Best match over all tiers.
    pub fn extract(&self, text: &str) -> Option<ExtractionMatch<PhoneMatch>> {
        let lines = split_lines(text);

        find_number(&lines)
            .or_else(|| find_availability(&lines))
            .or_else(|| find_mention(&lines))
    }
}

impl Default for PhoneDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for PhoneDetector {
    fn field_name(&self) -> &'static str {
        FIELD
    }

    fn detect(&self, text: &str) -> DetectionResult {
        self.detect_flat(text).into()
    }
}

impl PhoneDetector {
    /// Flat phone result, also used as the office `phone` sub-field.
    pub fn detect_flat(&self, text: &str) -> FieldResult {
        FieldResult::from_option(
            FIELD,
            self.extract(text).map(|m| {
                trace!("phone {:?} at {} from '{}'", m.value.tier, m.location(), m.source);
                (m.value.content, m.confidence)
            }),
        )
    }
}

fn find_number(lines: &[&str]) -> Option<ExtractionMatch<PhoneMatch>> {
    let mut unlabelled: Option<ExtractionMatch<PhoneMatch>> = None;

    for (i, line) in lines.iter().enumerate() {
        if SUPPORT_LINE.is_match(line) {
            continue;
        }

        let labelled = PHONE_LABEL.is_match(line)
            || (i > 0 && lines[i - 1].trim().len() < 30 && PHONE_LABEL.is_match(lines[i - 1]));
        let in_context = labelled || PHONE_CONTACT_CONTEXT.is_match(line);
        if !in_context {
            continue;
        }

        let Some(number) = number_in(line) else {
            continue;
        };

        let found = ExtractionMatch::new(
            PhoneMatch {
                tier: PhoneTier::Number,
                content: number,
            },
            if labelled { 0.95 } else { 0.85 },
            *line,
        );

        if labelled {
            return Some(found);
        }
        unlabelled.get_or_insert(found);
    }

    unlabelled
}

/// First valid 10- or 7-digit number on the line.
fn number_in(line: &str) -> Option<String> {
    let candidates = PHONE_NUMBER_10
        .find_iter(line)
        .chain(PHONE_NUMBER_7.find_iter(line));

    for m in candidates {
        let before = line[..m.start()].chars().next_back();
        let after = line[m.end()..].chars().next();
        if before.is_some_and(|c| c.is_ascii_digit()) || after.is_some_and(|c| c.is_ascii_digit()) {
            continue;
        }

        let number = m.as_str().trim();
        let digits = digit_count(number);
        let valid = digits == 7 || digits == 10 || (digits == 11 && number.trim_start_matches('+').starts_with('1'));
        if valid {
            return Some(number.to_string());
        }
    }

    None
}

fn find_availability(lines: &[&str]) -> Option<ExtractionMatch<PhoneMatch>> {
    let mut best: Option<ExtractionMatch<PhoneMatch>> = None;
    let mut best_weight = f32::MIN;

    for line in lines {
        if PHONE_PATTERNS.is_excluded(line) {
            continue;
        }
        if let Some(m) = PHONE_PATTERNS.best_rule_match(line) {
            if m.rule.weight > best_weight {
                best_weight = m.rule.weight;
                best = Some(
                    ExtractionMatch::new(
                        PhoneMatch {
                            tier: PhoneTier::Availability,
                            content: m.rule.name.to_string(),
                        },
                        PhoneTier::Availability.confidence(),
                        *line,
                    )
                    .with_position(m.start, m.end),
                );
            }
        }
    }

    best
}

fn find_mention(lines: &[&str]) -> Option<ExtractionMatch<PhoneMatch>> {
    for line in lines {
        if DEVICE_POLICY.is_match(line) || SUPPORT_LINE.is_match(line) {
            continue;
        }

        for m in PHONE_MENTION.find_iter(line) {
            let start = floor_boundary(line, m.start().saturating_sub(INTENT_WINDOW));
            let end = ceil_boundary(line, (m.end() + INTENT_WINDOW).min(line.len()));
            if CONTACT_INTENT.is_match(&line[start..end]) {
                return Some(ExtractionMatch::new(
                    PhoneMatch {
                        tier: PhoneTier::Mention,
                        content: MENTIONED_UNCLEAR.to_string(),
                    },
                    PhoneTier::Mention.confidence(),
                    *line,
                ));
            }
        }
    }

    None
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn detect(text: &str) -> Option<PhoneMatch> {
        PhoneDetector::new().extract(text).map(|m| m.value)
    }

    #[test]
    fn test_tier_one_number() {
        let m = detect("Phone: (603) 555-1234").unwrap();
        assert_eq!(m.tier, PhoneTier::Number);
        assert_eq!(m.content, "(603) 555-1234");
    }

    #[test]
    fn test_tier_two_availability() {
        let m = detect("Telephone contact should be used as a secondary method").unwrap();
        assert_eq!(m.tier, PhoneTier::Availability);
        assert_eq!(m.content, "Phone contact available");
    }

    #[test]
    fn test_tier_two_by_appointment() {
        let m = detect("Phone calls by appointment only.").unwrap();
        assert_eq!(m.content, "Phone by appointment");
    }

    #[test]
    fn test_tier_two_by_request() {
        let m = detect("Students may request a phone call through email.").unwrap();
        assert_eq!(m.content, "Phone by request");
    }

    #[test]
    fn test_tier_three_mention() {
        let m = detect("You can also reach me by phone during the day.").unwrap();
        assert_eq!(m.tier, PhoneTier::Mention);
        assert_eq!(m.content, MENTIONED_UNCLEAR);
    }

    #[test]
    fn test_highest_tier_wins_regardless_of_order() {
        let text = "Phone calls by appointment.\nOffice phone: 603-862-1234";
        let m = detect(text).unwrap();
        assert_eq!(m.tier, PhoneTier::Number);
        assert_eq!(m.content, "603-862-1234");
    }

    #[test]
    fn test_support_numbers_excluded() {
        assert_eq!(detect("IT Help Desk phone: 603-862-4242"), None);
        assert_eq!(detect("Crisis hotline: 988-555-0000"), None);
    }

    #[test]
    fn test_device_policy_not_a_mention() {
        assert_eq!(detect("Cell phones must be silenced; do not call or text in class."), None);
    }

    #[test]
    fn test_unlabelled_number_needs_context() {
        assert_eq!(detect("Course number 555-1234 is cross-listed"), None);
        let m = detect("Office: Hamilton Smith 210, 862-3456").unwrap();
        assert_eq!(m.content, "862-3456");
    }

    #[test]
    fn test_detect_flat_result() {
        let result = PhoneDetector::new().detect_flat("Phone: 603.555.9876");
        assert!(result.found);
        assert_eq!(result.content, "603.555.9876");
        assert_eq!(result.field_name, "phone");
    }
}
