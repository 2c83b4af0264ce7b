//! Course delivery modality classification.
//!
//! Independent online, in-person and hybrid signals are accumulated with
//! weights from the pattern library. Hybrid only wins when it is named
//! explicitly or when both other categories have evidence.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::detect::normalize::normalize;
use crate::detect::rules::library::{MODALITY_HYBRID, MODALITY_IN_PERSON, MODALITY_ONLINE};
use crate::detect::rules::patterns::MEETING_TIME;
use crate::detect::FieldDetector;
use crate::models::detection::{DetectionResult, FieldResult};

pub const FIELD: &str = "modality";

/// Each phrase counts at most this many times.
const REPEAT_CAP: usize = 3;
/// Floor applied to confidence once any signal is present.
const MIN_CONFIDENCE: f32 = 0.55;
const EVIDENCE_RADIUS: usize = 100;
const MAX_EVIDENCE: usize = 3;
/// Online rule that only supports other online evidence.
const SUPPORT_RULE: &str = "lms";

/// Course delivery mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modality {
    Online,
    Hybrid,
    #[serde(rename = "In-Person")]
    InPerson,
    Unknown,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Online => "Online",
            Modality::Hybrid => "Hybrid",
            Modality::InPerson => "In-Person",
            Modality::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated signal weights per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ModalityScores {
    pub online: f32,
    pub in_person: f32,
    pub hybrid: f32,
}

/// Classification outcome with supporting evidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalityAssessment {
    pub modality: Modality,
    pub confidence: f32,
    pub scores: ModalityScores,
    /// Short text windows around the winning category's signals.
    pub evidence: Vec<String>,
}

/// Classify the delivery modality of a document.
pub fn classify(text: &str) -> ModalityAssessment {
    let normalized = normalize(text).normalized;

    let online = MODALITY_ONLINE.weighted_hits(&normalized, REPEAT_CAP);
    let strong_online = MODALITY_ONLINE
        .rules
        .iter()
        .any(|r| r.name != SUPPORT_RULE && r.pattern.is_match(&normalized));
    let explicit_hybrid = MODALITY_HYBRID.weighted_hits(&normalized, REPEAT_CAP);

    let mut in_person = MODALITY_IN_PERSON.weighted_hits(&normalized, REPEAT_CAP);
    let has_place = MODALITY_IN_PERSON.rules.iter().any(|r| {
        matches!(r.name, "room" | "classroom" | "meets in") && r.pattern.is_match(&normalized)
    });
    if has_place && MEETING_TIME.is_match(&normalized) {
        in_person += 1.0;
    }

    let hybrid = explicit_hybrid
        + if strong_online { 0.5 } else { 0.0 }
        + if in_person > 0.0 { 0.5 } else { 0.0 };

    let scores = ModalityScores {
        online,
        in_person,
        hybrid,
    };

    let hybrid_wins = hybrid > 0.0
        && hybrid >= online.max(in_person)
        && (explicit_hybrid > 0.0 || (strong_online && in_person > 0.0));

    let mut modality = if hybrid_wins {
        Modality::Hybrid
    } else if online > in_person {
        Modality::Online
    } else if in_person > 0.0 {
        Modality::InPerson
    } else {
        Modality::Unknown
    };

    // Occasional online sessions do not make an in-person course online.
    if matches!(modality, Modality::Online | Modality::Hybrid)
        && in_person > 0.0
        && explicit_hybrid == 0.0
        && MODALITY_IN_PERSON.is_excluded(&normalized)
    {
        debug!("occasional-online wording present, keeping in-person");
        modality = Modality::InPerson;
    }

    let top = match modality {
        Modality::Online => online,
        Modality::Hybrid => hybrid,
        Modality::InPerson => in_person,
        Modality::Unknown => 0.0,
    };
    let total = online + in_person + explicit_hybrid;
    let confidence = if modality == Modality::Unknown || total == 0.0 {
        0.0
    } else {
        (top / total).clamp(MIN_CONFIDENCE, 1.0)
    };

    ModalityAssessment {
        modality,
        confidence,
        scores,
        evidence: evidence(&normalized, modality),
    }
}

fn evidence(text: &str, modality: Modality) -> Vec<String> {
    let sets = match modality {
        Modality::Online => vec![&*MODALITY_ONLINE],
        Modality::InPerson => vec![&*MODALITY_IN_PERSON],
        Modality::Hybrid => vec![&*MODALITY_HYBRID, &*MODALITY_ONLINE, &*MODALITY_IN_PERSON],
        Modality::Unknown => Vec::new(),
    };

    let mut snippets: Vec<String> = Vec::new();
    for m in sets.iter().flat_map(|set| set.rule_matches(text)) {
        if snippets.len() >= MAX_EVIDENCE {
            break;
        }
        let mut start = m.start.saturating_sub(EVIDENCE_RADIUS);
        while !text.is_char_boundary(start) {
            start -= 1;
        }
        let mut end = (m.end + EVIDENCE_RADIUS).min(text.len());
        while !text.is_char_boundary(end) {
            end += 1;
        }
        let snippet = text[start..end].trim().to_string();
        if !snippets.contains(&snippet) {
            snippets.push(snippet);
        }
    }

    snippets
}

/// Modality detector.
pub struct ModalityDetector;

impl ModalityDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ModalityDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for ModalityDetector {
    fn field_name(&self) -> &'static str {
        FIELD
    }

    fn detect(&self, text: &str) -> DetectionResult {
        let assessment = classify(text);
        match assessment.modality {
            Modality::Unknown => DetectionResult::missing(FIELD),
            modality => FieldResult::found(FIELD, modality.as_str(), assessment.confidence).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_and_meeting_time_is_in_person() {
        let text = "Class meetings: Tuesdays and Thursdays 9:40 - 11:00 am, Room 204.";
        let assessment = classify(text);
        assert_eq!(assessment.modality, Modality::InPerson);
        assert_eq!(assessment.scores.online, 0.0);
        assert!(assessment.confidence >= 0.55);
    }

    #[test]
    fn test_asynchronous_online() {
        let text = "This is a fully online, asynchronous course delivered through Canvas.";
        assert_eq!(classify(text).modality, Modality::Online);
    }

    #[test]
    fn test_explicit_hybrid() {
        let text = "This hybrid course meets in Hamilton Smith 129 on Mondays; \
                    remaining work is asynchronous.";
        assert_eq!(classify(text).modality, Modality::Hybrid);
    }

    #[test]
    fn test_lms_alone_does_not_beat_classroom() {
        let text = "We meet in person in the classroom. Slides are posted on Canvas.";
        assert_eq!(classify(text).modality, Modality::InPerson);
    }

    #[test]
    fn test_room_with_lms_is_in_person() {
        let assessment = classify("Location: Room 204\nAll readings are posted to Canvas.");
        assert_eq!(assessment.modality, Modality::InPerson);
        assert_eq!(assessment.scores.online, 0.25);
        assert_eq!(assessment.scores.hybrid, 0.5);
    }

    #[test]
    fn test_strong_online_and_room_is_hybrid() {
        let text = "Lectures are held via Zoom. Labs meet in Room 204.";
        assert_eq!(classify(text).modality, Modality::Hybrid);
    }

    #[test]
    fn test_occasional_online_override() {
        let text = "Class meets in person in Room 12. In case of inclement weather, \
                    we will meet via Zoom.";
        assert_eq!(classify(text).modality, Modality::InPerson);
    }

    #[test]
    fn test_unknown_is_not_found() {
        let result = ModalityDetector::new().detect("Chapter readings are listed below.");
        assert!(!result.is_found());
        assert_eq!(classify("").modality, Modality::Unknown);
    }

    #[test]
    fn test_detect_content_label() {
        let result = ModalityDetector::new().detect("Course format: face-to-face lectures in Room 101.");
        assert_eq!(result.content(), "In-Person");
    }
}
