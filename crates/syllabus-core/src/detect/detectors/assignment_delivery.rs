//! Where assignments are submitted.
//!
//! Every line naming a platform is a candidate; section titles, explicit
//! submission wording and an early position raise its score. Lines that
//! only say grades or materials live somewhere are skipped.

use lazy_static::lazy_static;
use regex::Regex;

use crate::detect::rules::library::ASSIGNMENT_DELIVERY_PATTERNS;
use crate::detect::sections::split_lines;
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::models::detection::{DetectionResult, FieldResult};

pub const FIELD: &str = "assignment_delivery";

const BASE_SCORE: u32 = 50;
const SECTION_BONUS: u32 = 40;
const CONTEXT_BONUS: u32 = 35;
const MULTI_PLATFORM_BONUS: u32 = 12;
/// Score at which confidence reaches 1.0.
const FULL_SCORE: f32 = 162.0;
const MIN_CONFIDENCE: f32 = 0.45;

const MIN_LINE: usize = 5;
const MAX_LINE: usize = 500;

lazy_static! {
    static ref DELIVERY_CONTEXT: Regex = Regex::new(
        r"(?i)assignments?\s+(?:are\s+)?(?:submitted|uploaded|turned\s+in|posted|delivered)\s+(?:via|on|to|through|using|in)|submit\s+(?:all\s+)?(?:your\s+)?(?:assignments?|work|papers?|homework)\s+(?:via|on|to|through|using|in)|(?:upload|post|turn\s+in)\s+(?:your\s+)?(?:assignments?|work|homework)\s+(?:via|on|to|through|in)|all\s+(?:assignments?|work|homework)\s+(?:will\s+be\s+)?(?:submitted|posted|uploaded)\s+(?:via|on|to|in)|(?:assignments?|homework)\s+(?:should|must)\s+be\s+(?:submitted|uploaded|posted|turned\s+in)\s+(?:via|on|to|in)"
    ).unwrap();

    static ref SECTION_INDICATOR: Regex = Regex::new(
        r"(?i)^\s*(?:assignment\s+(?:delivery|submission|platform)|submission\s+(?:method|platform|process)|how\s+to\s+submit|where\s+to\s+submit|(?:course|class)\s+(?:platform|management\s+system))\s*:?"
    ).unwrap();

    /// Mentions that name a platform without saying work goes there.
    static ref NOISE: Regex = Regex::new(
        r"(?i)\(embedded\s+in\s+[^)]+\)|\([^)]*grades?[^)]*\)|\bembedded\s+in\b|\bfor\s+grades?\b"
    ).unwrap();
}

#[derive(Debug)]
struct Candidate {
    platforms: Vec<&'static str>,
    score: u32,
    is_section: bool,
    has_context: bool,
    line: usize,
}

impl Candidate {
    fn rank(&self) -> (u32, bool, bool, usize, std::cmp::Reverse<usize>) {
        (
            self.score,
            self.is_section,
            self.has_context,
            self.platforms.len(),
            std::cmp::Reverse(self.line),
        )
    }
}

/// Assignment delivery detector.
pub struct AssignmentDeliveryDetector;

impl AssignmentDeliveryDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines = split_lines(text);
        let total = lines.len().max(1);

        let best = lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| candidate(i, line.trim(), total))
            .max_by_key(Candidate::rank)?;

        let confidence = (best.score as f32 / FULL_SCORE).clamp(MIN_CONFIDENCE, 1.0);
        Some(
            ExtractionMatch::new(best.platforms.join("; "), confidence, lines[best.line].trim())
                .with_position(best.line, best.line + 1),
        )
    }
}

fn candidate(i: usize, line: &str, total: usize) -> Option<Candidate> {
    let len = line.chars().count();
    if !(MIN_LINE..=MAX_LINE).contains(&len) {
        return None;
    }

    let has_context = DELIVERY_CONTEXT.is_match(line);
    if ASSIGNMENT_DELIVERY_PATTERNS.is_excluded(line) && !has_context {
        return None;
    }

    let cleaned = NOISE.replace_all(line, "");
    let mut platforms: Vec<&'static str> = ASSIGNMENT_DELIVERY_PATTERNS
        .rules
        .iter()
        .filter(|rule| rule.pattern.is_match(&cleaned))
        .map(|rule| rule.name)
        .collect();
    if platforms.is_empty() {
        return None;
    }
    platforms.sort_by_key(|p| p.to_lowercase());
    platforms.dedup();

    let is_section = SECTION_INDICATOR.is_match(line) || is_delivery_header(line);

    let mut score = BASE_SCORE;
    if is_section {
        score += SECTION_BONUS;
    }
    if has_context {
        score += CONTEXT_BONUS;
    }
    score += position_boost(i, total);
    if platforms.len() > 1 {
        score += MULTI_PLATFORM_BONUS;
    }

    Some(Candidate {
        platforms,
        score,
        is_section,
        has_context,
        line: i,
    })
}

/// `Assignment Submission: Canvas` style lines.
fn is_delivery_header(line: &str) -> bool {
    line.split_once(':')
        .is_some_and(|(head, _)| ASSIGNMENT_DELIVERY_PATTERNS.is_header(head))
}

fn position_boost(line: usize, total: usize) -> u32 {
    let ratio = line as f32 / total as f32;
    if ratio < 0.15 {
        25
    } else if ratio < 0.35 {
        18
    } else if ratio < 0.55 {
        10
    } else if ratio < 0.75 {
        5
    } else {
        0
    }
}

impl Default for AssignmentDeliveryDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for AssignmentDeliveryDetector {
    fn field_name(&self) -> &'static str {
        FIELD
    }

    fn detect(&self, text: &str) -> DetectionResult {
        FieldResult::from_option(FIELD, self.extract(text).map(ExtractionMatch::into_scored)).into()
    }
}
