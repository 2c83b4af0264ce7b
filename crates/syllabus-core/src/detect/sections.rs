//! Section header search and content-span capture.

use super::normalize::{clean_list_item, collapse_whitespace, is_list_item, normalize_line};
use super::rules::library::{header_key, is_section_boundary, FieldPatterns};

/// Limits on how much text is captured after a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanLimits {
    pub max_lines: usize,
    pub max_chars: usize,
}

impl SpanLimits {
    pub const fn new(max_lines: usize, max_chars: usize) -> Self {
        Self { max_lines, max_chars }
    }
}

/// A section header found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderHit {
    /// Zero-based line index of the header.
    pub line: usize,
    /// Header line as written, trimmed.
    pub text: String,
    /// Text after `Header:` on the same line, if any.
    pub inline: Option<String>,
}

/// Matches lines against a field's section titles plus configured extras.
#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    titles: Vec<String>,
}

impl HeaderMatcher {
    pub fn new(patterns: &FieldPatterns, extra: &[String]) -> Self {
        let mut titles: Vec<String> = patterns.headers.iter().map(|h| h.to_string()).collect();
        titles.extend(extra.iter().map(|h| normalize_line(h)));
        Self { titles }
    }

    fn is_title(&self, candidate: &str) -> bool {
        let key = header_key(candidate);
        !key.is_empty() && self.titles.iter().any(|t| *t == key)
    }

    /// Classify one line as an isolated header, an inline `Header: text`
    /// header, or neither.
    pub fn match_line(&self, line_no: usize, line: &str) -> Option<HeaderHit> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.len() > 200 {
            return None;
        }

        if self.is_title(trimmed) {
            return Some(HeaderHit {
                line: line_no,
                text: trimmed.to_string(),
                inline: None,
            });
        }

        let (head, rest) = trimmed.split_once(':')?;
        let rest = rest.trim();
        if !rest.is_empty() && head.len() <= 80 && self.is_title(head) {
            return Some(HeaderHit {
                line: line_no,
                text: head.trim().to_string(),
                inline: Some(rest.to_string()),
            });
        }

        None
    }

    /// Every header occurrence in `lines`, in document order.
    pub fn find_all(&self, lines: &[&str]) -> Vec<HeaderHit> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| self.match_line(i, line))
            .collect()
    }
}

/// Capture the lines after `header_line` until the next section boundary
/// or a limit is reached. Bullets are stripped and wrapped list items are
/// rejoined.
pub fn capture_section(lines: &[&str], header_line: usize, limits: SpanLimits) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    let mut chars = 0;
    let mut last_was_item = false;

    for line in lines.iter().skip(header_line + 1) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_section_boundary(trimmed) {
            break;
        }

        let cleaned = collapse_whitespace(&clean_list_item(trimmed));
        if cleaned.is_empty() {
            continue;
        }

        let continues_item = last_was_item
            && !is_list_item(trimmed)
            && cleaned.chars().next().is_some_and(|c| c.is_lowercase());

        if continues_item {
            if let Some(prev) = items.last_mut() {
                prev.push(' ');
                prev.push_str(&cleaned);
            }
        } else {
            if items.len() >= limits.max_lines {
                break;
            }
            items.push(cleaned.clone());
            last_was_item = is_list_item(trimmed);
        }

        chars += cleaned.len();
        if chars >= limits.max_chars {
            break;
        }
    }

    items
}

/// Lines of a document, keeping empty lines so indices stay stable.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::rules::library::SLO_PATTERNS;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_match_isolated_and_inline_headers() {
        let matcher = HeaderMatcher::new(&SLO_PATTERNS, &[]);

        let hit = matcher.match_line(0, "Student Learning Outcomes:").unwrap();
        assert_eq!(hit.inline, None);

        let hit = matcher
            .match_line(3, "Learning Objectives: Students will write clearly.")
            .unwrap();
        assert_eq!(hit.line, 3);
        assert_eq!(hit.text, "Learning Objectives");
        assert_eq!(hit.inline.as_deref(), Some("Students will write clearly."));

        assert!(matcher.match_line(0, "Learning outcomes are listed below").is_none());
    }

    #[test]
    fn test_extra_titles() {
        let matcher = HeaderMatcher::new(&SLO_PATTERNS, &["Course Goals".to_string()]);
        assert!(matcher.match_line(0, "COURSE GOALS").is_some());
    }

    #[test]
    fn test_capture_until_boundary() {
        let text = "Student Learning Outcomes:\n\
                    • Explain core concepts.\n\
                    • Apply methods to new\n  problems in the field.\n\
                    \n\
                    • Communicate results.\n\
                    Grading Policy\n\
                    Exams 50%";
        let lines = split_lines(text);
        let items = capture_section(&lines, 0, SpanLimits::new(15, 1500));
        assert_eq!(
            items,
            vec![
                "Explain core concepts.".to_string(),
                "Apply methods to new problems in the field.".to_string(),
                "Communicate results.".to_string(),
            ]
        );
    }

    #[test]
    fn test_capture_respects_line_limit() {
        let text = "Header\n- a1\n- a2\n- a3\n- a4";
        let lines = split_lines(text);
        let items = capture_section(&lines, 0, SpanLimits::new(2, 1500));
        assert_eq!(items.len(), 2);
    }
}
