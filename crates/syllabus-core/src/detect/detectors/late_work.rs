//! Late and missing work policy detection.
//!
//! Header lines naming an approved title are scored by how header-like they
//! look; the best one plus the lines after it form the content. Without a
//! header, a single sentence about late penalties is returned at lower
//! confidence.

use tracing::debug;

use crate::detect::normalize::normalize_line;
use crate::detect::rules::library::{is_section_boundary, LATE_WORK_PATTERNS};
use crate::detect::sections::split_lines;
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::error::DetectorError;
use crate::models::detection::{DetectionResult, FieldResult};

pub const FIELD: &str = "late_work";

const MAX_CONTENT_LINES: usize = 10;
const MAX_CONTENT_CHARS: usize = 500;

const SCORE_STARTS_WITH_TITLE: i32 = 10;
const SCORE_SHORT_LINE: i32 = 5;
const SCORE_LONG_LINE: i32 = -5;
const SCORE_COLON: i32 = 3;
const SCORE_ALL_CAPS: i32 = 2;
const MIN_SCORE: i32 = 5;

const SHORT_LINE: usize = 60;
const LONG_LINE: usize = 120;

/// Extra words tolerated around a title, by where the title sits.
const EXTRA_WORDS_ISOLATED: usize = 2;
const EXTRA_WORDS_START: usize = 4;
const EXTRA_WORDS_END: usize = 3;

/// Late work detector.
pub struct LateWorkDetector {
    titles: Vec<String>,
}

impl LateWorkDetector {
    pub fn new() -> Self {
        Self {
            titles: LATE_WORK_PATTERNS.headers.iter().map(|h| h.to_string()).collect(),
        }
    }

    /// Create a detector that also accepts the given section titles.
    pub fn with_extra_headers(extra: &[String]) -> Result<Self, DetectorError> {
        let mut detector = Self::new();
        for header in extra {
            let title = normalize_line(header);
            if title.is_empty() {
                return Err(DetectorError::Unavailable {
                    field: FIELD.to_string(),
                    reason: format!("invalid extra header {:?}", header),
                });
            }
            detector.titles.push(title);
        }
        Ok(detector)
    }

    pub fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        self.from_header(text).or_else(|| self.from_sentence(text))
    }

    fn from_header(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines = split_lines(text);

        let mut best: Option<(i32, usize)> = None;
        for (i, line) in lines.iter().enumerate() {
            if let Some(score) = self.score_header(line) {
                if best.is_none_or(|(b, _)| score > b) {
                    best = Some((score, i));
                }
            }
        }

        let (score, line_no) = best?;
        if score < MIN_SCORE {
            debug!("best late work header scored {}, below threshold", score);
            return None;
        }

        let title = lines[line_no].trim();
        let mut content = vec![title.to_string()];
        let mut chars = title.len();

        for line in lines.iter().skip(line_no + 1).take(MAX_CONTENT_LINES - 1) {
            let next = line.trim();
            if next.is_empty() {
                continue;
            }
            if is_section_boundary(next) {
                break;
            }
            content.push(next.to_string());
            chars += next.len();
            if chars > MAX_CONTENT_CHARS {
                break;
            }
        }

        Some(ExtractionMatch::new(content.join("\n"), 0.9, title).with_position(line_no, line_no + 1))
    }

    fn from_sentence(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let m = LATE_WORK_PATTERNS.best_rule_match(text)?;
        let sentence = m.text.trim();
        if sentence.is_empty() {
            return None;
        }
        Some(ExtractionMatch::new(sentence.to_string(), 0.6, m.text).with_position(m.start, m.end))
    }

    /// Header score for a line, or `None` when no title appears in
    /// header-like form.
    fn score_header(&self, line: &str) -> Option<i32> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let normalized = normalize_line(trimmed);
        let bare = normalized.replace([':', '.'], "");
        let bare = bare.trim();
        let words = bare.split_whitespace().count();
        let has_colon = trimmed.contains(':');
        let all_caps = is_upper(trimmed);

        let valid = self.titles.iter().any(|title| {
            if !bare.contains(title.as_str()) {
                return false;
            }
            let title_words = title.split_whitespace().count();

            if words <= title_words + EXTRA_WORDS_ISOLATED {
                has_colon
                    || all_caps
                    || (words == title_words && !normalized.ends_with([',', ';', '.', '!', '?']))
            } else if bare.starts_with(title.as_str()) {
                has_colon || words <= title_words + EXTRA_WORDS_START
            } else if bare.ends_with(title.as_str()) {
                words <= title_words + EXTRA_WORDS_END
            } else {
                false
            }
        });
        if !valid {
            return None;
        }

        let mut score = 0;
        if self.titles.iter().any(|t| bare.starts_with(t.as_str())) {
            score += SCORE_STARTS_WITH_TITLE;
        }
        if bare.len() < SHORT_LINE {
            score += SCORE_SHORT_LINE;
        }
        if bare.len() > LONG_LINE {
            score += SCORE_LONG_LINE;
        }
        if has_colon {
            score += SCORE_COLON;
        }
        if all_caps {
            score += SCORE_ALL_CAPS;
        }
        Some(score)
    }
}

fn is_upper(line: &str) -> bool {
    line.chars().any(|c| c.is_alphabetic()) && !line.chars().any(|c| c.is_lowercase())
}

impl Default for LateWorkDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for LateWorkDetector {
    fn field_name(&self) -> &'static str {
        FIELD
    }

    fn detect(&self, text: &str) -> DetectionResult {
        FieldResult::from_option(FIELD, self.extract(text).map(ExtractionMatch::into_scored)).into()
    }
}
