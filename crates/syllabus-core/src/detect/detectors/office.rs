//! Office information: location, hours and phone.

use lazy_static::lazy_static;
use regex::Regex;

use super::phone::PhoneDetector;
use crate::detect::normalize::collapse_whitespace;
use crate::detect::rules::library::OFFICE_PATTERNS;
use crate::detect::rules::patterns::{BUILDING_ROOM, CLOCK_TIME, DAY_NAME, ROOM};
use crate::detect::sections::split_lines;
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::models::detection::{DetectionResult, FieldResult, SubfieldLayout};

pub const FIELD: &str = "office_information";
pub const LOCATION: &str = "office_location";
pub const HOURS: &str = "office_hours";
pub const PHONE: &str = "phone";

pub const SUBFIELDS: &[&str] = &[LOCATION, HOURS, PHONE];

lazy_static! {
    static ref OFFICE_LABEL: Regex = Regex::new(
        r"(?i)^\s*(?:instructor(?:'s)?\s+)?office(?:\s+(?:location|room|address|number))?\s*[:\-–]\s*(.+?)\s*$"
    ).unwrap();

    static ref HOURS_LABEL: Regex = Regex::new(
        r"(?i)^\s*(?:office|student|drop-in|virtual\s+office)\s+hours?(?:\s+and\s+location)?\s*[:\-–]?\s*(.*?)\s*$"
    ).unwrap();

    static ref HOURS_INLINE: Regex = Regex::new(
        r"(?i)\boffice\s+hours?\b(?:\s+(?:are|will\s+be|held))?[^.\n]{0,40}?\b((?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?[^.\n]{0,60}?\d{1,2}(?::\d{2})?\s*(?:am|pm|a\.m\.|p\.m\.)?)"
    ).unwrap();

    static ref CLASSROOM_INDICATOR: Regex = Regex::new(
        r"(?i)\b(?:class(?:room)?|lecture|meets|lab\s+section|recitation|course\s+location)\b"
    ).unwrap();

    static ref HOURS_STOP: Regex = Regex::new(
        r"(?i)\s*(?:[;|]|\boffice\s*(?:location|room)?\s*:|\be-?mail\s*:|\bphone\s*:).*$"
    ).unwrap();
}

/// Office information detector.
pub struct OfficeDetector {
    phone: PhoneDetector,
}

impl OfficeDetector {
    pub fn new() -> Self {
        Self {
            phone: PhoneDetector::new(),
        }
    }

    /// Office location.
    pub fn extract_location(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines = split_lines(text);

        for line in &lines {
            if let Some(caps) = OFFICE_LABEL.captures(line) {
                let value = caps[1].trim();
                if value.to_lowercase().starts_with("hours") || CLASSROOM_INDICATOR.is_match(value) {
                    continue;
                }
                let value = HOURS_STOP.replace(value, "");
                if let Some(location) = room_in(&value) {
                    return Some(ExtractionMatch::new(location, 0.9, *line));
                }
                if value.len() <= 60 && value.chars().any(|c| c.is_ascii_digit()) {
                    return Some(ExtractionMatch::new(value.trim().to_string(), 0.75, *line));
                }
            }
        }

        for line in &lines {
            let lower = line.to_lowercase();
            if !lower.contains("office") {
                continue;
            }

            // A classroom reference before the room means the room is not the office.
            let room_pos = ROOM.find(line).map(|m| m.start());
            let class_pos = CLASSROOM_INDICATOR.find(line).map(|m| m.start());
            if let (Some(room), Some(class)) = (room_pos, class_pos) {
                if class < room {
                    continue;
                }
            }

            if let Some(location) = room_in(line) {
                return Some(ExtractionMatch::new(location, 0.7, *line));
            }
        }

        None
    }

    /// Office hours.
    pub fn extract_hours(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines = split_lines(text);

        if let Some(m) = OFFICE_PATTERNS.first_rule_match(text) {
            if m.rule.name == "tbd" {
                return Some(ExtractionMatch::new("TBD".to_string(), 0.9, m.text));
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let Some(caps) = HOURS_LABEL.captures(line) else {
                continue;
            };

            let inline = HOURS_STOP.replace(caps[1].trim(), "").trim().to_string();
            if looks_like_hours(&inline) {
                return Some(ExtractionMatch::new(inline, 0.9, *line));
            }

            let following: Vec<String> = lines
                .iter()
                .skip(i + 1)
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .take(3)
                .take_while(|l| looks_like_hours(l))
                .map(collapse_whitespace)
                .collect();
            if !following.is_empty() {
                return Some(ExtractionMatch::new(following.join("\n"), 0.85, *line));
            }
        }

        if let Some(caps) = HOURS_INLINE.captures(text) {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            return Some(ExtractionMatch::new(collapse_whitespace(&caps[1]), 0.75, whole));
        }

        OFFICE_PATTERNS
            .rule_matches(text)
            .into_iter()
            .find(|m| m.rule.name == "by appointment" && near_office_hours(text, m.start))
            .map(|m| ExtractionMatch::new("By appointment".to_string(), 0.6, m.text))
    }
}

/// Room text from a line, preferring building plus room.
fn room_in(line: &str) -> Option<String> {
    if let Some(m) = BUILDING_ROOM.find(line) {
        return Some(collapse_whitespace(m.as_str()));
    }
    ROOM.find(line).map(|m| collapse_whitespace(m.as_str()))
}

fn looks_like_hours(text: &str) -> bool {
    let lower = text.to_lowercase();
    !text.is_empty()
        && (DAY_NAME.is_match(text)
            || CLOCK_TIME.is_match(text)
            || lower.contains("appointment")
            || lower.contains("tbd")
            || lower.contains("tba")
            || lower.contains("zoom"))
}

fn near_office_hours(text: &str, pos: usize) -> bool {
    let lower = text.to_lowercase();
    let mut start = pos.saturating_sub(120);
    while start > 0 && !lower.is_char_boundary(start) {
        start -= 1;
    }
    let end = pos.min(lower.len());
    lower.get(start..end).is_some_and(|w| w.contains("office hour"))
}

impl Default for OfficeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for OfficeDetector {
    fn field_name(&self) -> &'static str {
        FIELD
    }

    fn detect(&self, text: &str) -> DetectionResult {
        let location = FieldResult::from_option(
            LOCATION,
            self.extract_location(text).map(ExtractionMatch::into_scored),
        );
        let hours = FieldResult::from_option(
            HOURS,
            self.extract_hours(text).map(ExtractionMatch::into_scored),
        );
        let phone = self.phone.detect_flat(text);

        DetectionResult::composite(FIELD, SubfieldLayout::Nested, vec![location, hours, phone])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "Instructor: Dr. Maria Lopez\n\
                          Office: Kingsbury Hall Room 233\n\
                          Office Hours: Tuesdays 1:00-3:00 PM or by appointment\n\
                          Phone: (603) 862-1234\n\
                          Class meets in Parsons Hall 118, MWF 10:10-11:00";

    #[test]
    fn test_full_office_block() {
        let result = OfficeDetector::new().detect(SAMPLE);
        assert_eq!(result.subfield(LOCATION).unwrap().content, "Kingsbury Hall Room 233");
        assert_eq!(
            result.subfield(HOURS).unwrap().content,
            "Tuesdays 1:00-3:00 PM or by appointment"
        );
        assert_eq!(result.subfield(PHONE).unwrap().content, "(603) 862-1234");
    }

    #[test]
    fn test_hours_tbd() {
        let m = OfficeDetector::new().extract_hours("Office hours: TBD").unwrap();
        assert_eq!(m.value, "TBD");
    }

    #[test]
    fn test_hours_on_following_lines() {
        let text = "Office Hours\nMonday 2-4 pm\nWednesday 10-11 am\nCourse Description";
        let m = OfficeDetector::new().extract_hours(text).unwrap();
        assert_eq!(m.value, "Monday 2-4 pm\nWednesday 10-11 am");
    }

    #[test]
    fn test_classroom_is_not_office() {
        let text = "Our class meets in Room 105, next to my office.";
        assert!(OfficeDetector::new().extract_location(text).is_none());
    }

    #[test]
    fn test_composite_shape_when_empty() {
        let result = OfficeDetector::new().detect("");
        assert!(!result.is_found());
        for sub in SUBFIELDS {
            assert!(result.subfield(sub).is_some());
        }
    }
}
