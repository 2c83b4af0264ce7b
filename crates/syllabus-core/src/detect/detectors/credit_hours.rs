//! Credit hour detection.

use crate::detect::rules::library::CREDIT_HOURS_PATTERNS;
use crate::detect::{ExtractionMatch, FieldDetector};
use crate::models::detection::{DetectionResult, FieldResult};

pub const FIELD: &str = "credit_hours";

/// Plausible credit values.
const MIN_CREDITS: f32 = 0.5;
const MAX_CREDITS: f32 = 12.0;

/// How far before a match a "per credit" phrase still vetoes it.
const EXCLUSION_LOOKBEHIND: usize = 24;

/// Credit hour detector.
pub struct CreditHoursDetector;

impl CreditHoursDetector {
    pub fn new() -> Self {
        Self
    }

    /// Labelled values win over inline ones; within a rule the earliest
    /// plausible value is taken.
    pub fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        for rule in &CREDIT_HOURS_PATTERNS.rules {
            for caps in rule.pattern.captures_iter(text) {
                let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };

                let value: f32 = match number.as_str().parse() {
                    Ok(v) => v,
                    Err(_) => continue,
                };
                if !(MIN_CREDITS..=MAX_CREDITS).contains(&value) {
                    continue;
                }

                let window = local_window(text, whole.start(), whole.end());
                if CREDIT_HOURS_PATTERNS.is_excluded(window) {
                    continue;
                }

                return Some(
                    ExtractionMatch::new(format_credits(value), rule.weight.min(0.95), whole.as_str())
                        .with_position(whole.start(), whole.end()),
                );
            }
        }

        None
    }
}

fn local_window(text: &str, start: usize, end: usize) -> &str {
    let mut from = start.saturating_sub(EXCLUSION_LOOKBEHIND);
    while from > 0 && !text.is_char_boundary(from) {
        from -= 1;
    }
    &text[from..end]
}

fn format_credits(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as u32)
    } else {
        format!("{:.1}", value)
    }
}

impl Default for CreditHoursDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDetector for CreditHoursDetector {
    fn field_name(&self) -> &'static str {
        FIELD
    }

    fn detect(&self, text: &str) -> DetectionResult {
        FieldResult::from_option(FIELD, self.extract(text).map(ExtractionMatch::into_scored)).into()
    }
}
