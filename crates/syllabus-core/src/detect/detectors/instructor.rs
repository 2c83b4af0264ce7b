//! Instructor identity: name, title and department.

use lazy_static::lazy_static;
use regex::Regex;

use crate::detect::normalize::collapse_whitespace;
use crate::detect::rules::library::INSTRUCTOR_PATTERNS;
use crate::detect::sections::split_lines;
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::models::detection::{DetectionResult, FieldResult, SubfieldLayout};

pub const FIELD: &str = "instructor";
pub const NAME: &str = "name";
pub const TITLE: &str = "title";
pub const DEPARTMENT: &str = "department";

pub const SUBFIELDS: &[&str] = &[NAME, TITLE, DEPARTMENT];

/// Instructor details appear near the top of a syllabus.
const HEAD_LINES: usize = 30;

lazy_static! {
    static ref NAME_LABEL: Regex = Regex::new(
        r"(?i)^\s*(?:course\s+)?(?:instructor|professor|lecturer|faculty|teacher)(?:'s)?(?:\s+name)?\s*[:\-–]\s*(.*)$"
    ).unwrap();

    static ref HONORIFIC: Regex = Regex::new(
        r"^(?i:dr\.?|prof\.?|professor|mr\.?|ms\.?|mrs\.?|mx\.?)\s+"
    ).unwrap();

    static ref TITLED_NAME: Regex = Regex::new(
        r"\b(?:Dr\.?|Prof\.?|Professor)\s+((?:[A-Z][a-z'\-]+|[A-Z]\.)(?:\s+(?:[A-Z][a-z'\-]+|[A-Z]\.)){1,3})"
    ).unwrap();

    static ref NAME_CUT: Regex = Regex::new(
        r"(?i)\s*(?:[,(|;•]|\s-\s|\s–\s|\S+@\S+|\b(?:office|email|e-mail|phone|ph\.?d)\b).*$"
    ).unwrap();

    static ref DEPARTMENT_OF: Regex = Regex::new(
        r"\b((?:Department|Dept\.?)\s+of\s+[A-Z][A-Za-z&'\-]*(?:\s+(?:and|&|of|[A-Z][A-Za-z&'\-]*))*)"
    ).unwrap();

    static ref DEPARTMENT_LABEL: Regex = Regex::new(
        r"(?i)^\s*(?:department|dept\.?|program)\s*[:\-–]\s*(.+?)\s*$"
    ).unwrap();

    static ref SCHOOL_OF: Regex = Regex::new(
        r"\b((?:School|College|Division)\s+of\s+[A-Z][A-Za-z&'\-]*(?:\s+(?:and|&|of|[A-Z][A-Za-z&'\-]*))*)"
    ).unwrap();

    static ref PROFESSOR_OF: Regex = Regex::new(
        r"\bProfessor\s+of\s+([A-Z][A-Za-z&'\-]*(?:\s+(?:and|&|[A-Z][A-Za-z&'\-]*))*)"
    ).unwrap();
}

/// Instructor identity detector.
pub struct InstructorDetector;

impl InstructorDetector {
    pub fn new() -> Self {
        Self
    }

    fn head<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_lines(text).into_iter().take(HEAD_LINES).collect()
    }

    pub fn extract_name(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines = self.head(text);

        for (i, line) in lines.iter().enumerate() {
            let Some(caps) = NAME_LABEL.captures(line) else {
                continue;
            };

            let mut candidate = caps[1].trim().to_string();
            if candidate.is_empty() {
                candidate = lines.get(i + 1).map(|l| l.trim().to_string()).unwrap_or_default();
            }

            if let Some(name) = clean_name(&candidate) {
                return Some(ExtractionMatch::new(name, 0.95, *line));
            }
        }

        lines.iter().find_map(|line| {
            TITLED_NAME
                .captures(line)
                .and_then(|caps| clean_name(&caps[1]))
                .map(|name| ExtractionMatch::new(name, 0.7, *line))
        })
    }

    pub fn extract_title(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines = self.head(text);

        let mut best: Option<ExtractionMatch<String>> = None;
        for line in &lines {
            if let Some(m) = INSTRUCTOR_PATTERNS.best_rule_match(line) {
                let better = best.as_ref().is_none_or(|b| m.rule.weight > b.confidence);
                if better {
                    best = Some(
                        ExtractionMatch::new(title_case(m.text), m.rule.weight, *line)
                            .with_position(m.start, m.end),
                    );
                }
            }
        }
        if best.is_some() {
            return best;
        }

        lines.iter().find_map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("Dr.") || trimmed.starts_with("Dr ") {
                Some(ExtractionMatch::new("Dr.".to_string(), 0.5, *line))
            } else if TITLED_NAME.is_match(trimmed) && trimmed.starts_with("Prof") {
                Some(ExtractionMatch::new("Professor".to_string(), 0.5, *line))
            } else {
                None
            }
        })
    }

    pub fn extract_department(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines = self.head(text);

        for line in &lines {
            if let Some(caps) = DEPARTMENT_OF.captures(line) {
                return Some(ExtractionMatch::new(trim_department(&caps[1]), 0.9, *line));
            }
        }
        for line in &lines {
            if let Some(caps) = DEPARTMENT_LABEL.captures(line) {
                return Some(ExtractionMatch::new(trim_department(&caps[1]), 0.85, *line));
            }
        }
        for line in &lines {
            if let Some(caps) = SCHOOL_OF.captures(line) {
                return Some(ExtractionMatch::new(trim_department(&caps[1]), 0.7, *line));
            }
        }
        lines.iter().find_map(|line| {
            PROFESSOR_OF
                .captures(line)
                .map(|caps| ExtractionMatch::new(trim_department(&caps[1]), 0.6, *line))
        })
    }
}

/// Validate and clean a candidate person name.
fn clean_name(candidate: &str) -> Option<String> {
    let without_title = HONORIFIC.replace(candidate.trim(), "");
    let cut = NAME_CUT.replace(&without_title, "");
    let name = collapse_whitespace(&cut);

    let parts: Vec<&str> = name.split_whitespace().collect();
    if !(2..=4).contains(&parts.len()) {
        return None;
    }

    let capitalized = parts.iter().all(|p| {
        p.chars().next().is_some_and(|c| c.is_uppercase())
            && p.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '\'' | '-'))
    });
    if !capitalized || INSTRUCTOR_PATTERNS.is_excluded(&name) {
        return None;
    }

    Some(name)
}

fn trim_department(raw: &str) -> String {
    let cut = raw
        .split(['|', ',', ';', '•'])
        .next()
        .unwrap_or(raw)
        .split("  ")
        .next()
        .unwrap_or(raw);
    let words: Vec<&str> = cut.split_whitespace().collect();

    // Drop trailing connective words left by the greedy match.
    let end = words
        .iter()
        .rposition(|w| !matches!(*w, "and" | "&" | "of"))
        .map_or(0, |i| i + 1);
    words[..end].join(" ")
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

impl Default for InstructorDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for InstructorDetector {
    fn field_name(&self) -> &'static str {
        FIELD
    }

    fn detect(&self, text: &str) -> DetectionResult {
        DetectionResult::composite(
            FIELD,
            SubfieldLayout::Inline,
            vec![
                FieldResult::from_option(NAME, self.extract_name(text).map(ExtractionMatch::into_scored)),
                FieldResult::from_option(TITLE, self.extract_title(text).map(ExtractionMatch::into_scored)),
                FieldResult::from_option(
                    DEPARTMENT,
                    self.extract_department(text).map(ExtractionMatch::into_scored),
                ),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "PSYC 401: Research Methods\n\
                          Department of Psychology, College of Liberal Arts\n\
                          Instructor: Dr. Jane A. Smith, Associate Professor\n\
                          Email: jane.smith@unh.edu";

    #[test]
    fn test_full_header() {
        let result = InstructorDetector::new().detect(HEADER);
        assert_eq!(result.subfield(NAME).unwrap().content, "Jane A. Smith");
        assert_eq!(result.subfield(TITLE).unwrap().content, "Associate Professor");
        assert_eq!(result.subfield(DEPARTMENT).unwrap().content, "Department of Psychology");
    }

    #[test]
    fn test_name_on_next_line() {
        let text = "Instructor:\nRobert Chen\nOffice: Hall 2";
        let m = InstructorDetector::new().extract_name(text).unwrap();
        assert_eq!(m.value, "Robert Chen");
    }

    #[test]
    fn test_rejects_non_names() {
        assert!(clean_name("TBA").is_none());
        assert!(clean_name("Office Hours Monday").is_none());
        assert!(clean_name("see course website for details").is_none());
        assert_eq!(clean_name("Prof. Lee Park (she/her)"), Some("Lee Park".to_string()));
    }

    #[test]
    fn test_titled_name_fallback() {
        let text = "Welcome to Biology!\nDr. Samuel Okafor will lead the labs.";
        let m = InstructorDetector::new().extract_name(text).unwrap();
        assert_eq!(m.value, "Samuel Okafor");
        assert!(m.confidence < 0.9);
    }

    #[test]
    fn test_professor_of_department() {
        let text = "Maya Patel, Professor of Civil Engineering";
        let m = InstructorDetector::new().extract_department(text).unwrap();
        assert_eq!(m.value, "Civil Engineering");
    }

    #[test]
    fn test_lecturer_title() {
        let m = InstructorDetector::new()
            .extract_title("Instructor: Alex Kim, Senior Lecturer")
            .unwrap();
        assert_eq!(m.value, "Senior Lecturer");
    }
}
