//! Class meeting location detection.

use std::cmp::Ordering;

use crate::detect::normalize::collapse_whitespace;
use crate::detect::rules::library::CLASS_LOCATION_PATTERNS;
use crate::detect::rules::patterns::{
    BUILDING_CODE_ROOM, BUILDING_ROOM, CLASS_CONTEXT, LOCATION_LABEL, OFFICE_CONTEXT, ROOM, YEAR,
};
use crate::detect::sections::split_lines;
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::models::detection::{DetectionResult, FieldResult};

pub const FIELD: &str = "class_location";

/// Lines this close to the top get a small boost.
const HEADER_LINES: usize = 20;

/// Where a candidate line sits relative to class or office wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum LineContext {
    Neutral = 1,
    Class = 2,
}

#[derive(Debug, Clone)]
struct Candidate {
    text: String,
    context: LineContext,
    confidence: f32,
    line: usize,
}

/// Class location detector.
pub struct ClassLocationDetector;

impl ClassLocationDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines = split_lines(text);
        let mut candidates: Vec<Candidate> = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            let context = match classify_line(line) {
                Some(context) => context,
                None => continue,
            };

            let mut boost = if i < HEADER_LINES { 0.15 } else { 0.0 };

            let (value, explicit) = match LOCATION_LABEL.captures(line) {
                Some(caps) => (caps[1].to_string(), true),
                None => (line.to_string(), false),
            };
            if explicit {
                boost += 0.25;
            }

            if let Some((room, confidence)) = room_candidate(&value, explicit) {
                candidates.push(Candidate {
                    text: room,
                    context,
                    confidence: confidence + boost,
                    line: i,
                });
            } else if explicit && is_online_value(&value) {
                candidates.push(Candidate {
                    text: "Online".to_string(),
                    context,
                    confidence: 0.5 + boost,
                    line: i,
                });
            }
        }

        candidates
            .into_iter()
            .max_by(|a, b| {
                a.context
                    .cmp(&b.context)
                    .then(a.confidence.partial_cmp(&b.confidence).unwrap_or(Ordering::Equal))
                    .then(b.line.cmp(&a.line))
            })
            .map(|c| ExtractionMatch::new(c.text, c.confidence.min(1.0), lines[c.line]))
    }
}

/// Office lines are rejected outright; class wording outranks neutral lines.
fn classify_line(line: &str) -> Option<LineContext> {
    let office = OFFICE_CONTEXT.find(line).map(|m| m.start());
    let class = CLASS_CONTEXT.find(line).map(|m| m.start());

    match (office, class) {
        (Some(o), Some(c)) if c < o => Some(LineContext::Class),
        (Some(_), _) => None,
        (None, Some(_)) => Some(LineContext::Class),
        (None, None) => Some(LineContext::Neutral),
    }
}

fn room_candidate(value: &str, explicit: bool) -> Option<(String, f32)> {
    if let Some(caps) = BUILDING_ROOM.captures(value) {
        if !YEAR.is_match(&caps[2]) {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            return Some((collapse_whitespace(whole), 0.85));
        }
    }

    if let Some(caps) = ROOM.captures(value) {
        if !YEAR.is_match(&caps[1]) {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            return Some((collapse_whitespace(whole), 0.7));
        }
    }

    // Building codes such as "PCAC 210" look like course codes; only trust
    // them behind an explicit location label.
    if explicit {
        if let Some(caps) = BUILDING_CODE_ROOM.captures(value) {
            if !YEAR.is_match(&caps[2]) && !CLASS_LOCATION_PATTERNS.is_excluded(value) {
                let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
                return Some((collapse_whitespace(whole), 0.5));
            }
        }
    }

    None
}

fn is_online_value(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower.starts_with("online") || lower.starts_with("zoom") || lower.contains("remote")
}

impl Default for ClassLocationDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for ClassLocationDetector {
    fn field_name(&self) -> &'static str {
        FIELD
    }

    fn detect(&self, text: &str) -> DetectionResult {
        FieldResult::from_option(FIELD, self.extract(text).map(ExtractionMatch::into_scored)).into()
    }
}
