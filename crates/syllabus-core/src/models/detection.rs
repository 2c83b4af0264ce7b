//! Detection result models.
//!
//! Every detector produces a [`DetectionResult`]. Most fields are flat
//! `{field_name, found, content}` records; instructor and office details are
//! composites of several flat sub-results.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Mapping from field name to its detection result for one document.
pub type DetectionMap = BTreeMap<String, DetectionResult>;

/// A single flat detection.
///
/// Constructors keep `found` and `content` consistent: a found result always
/// has non-blank content and a missing result always has empty content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldResult {
    /// Stable field identifier.
    pub field_name: String,
    /// Whether the field was judged present.
    pub found: bool,
    /// Extracted value, empty when not found.
    pub content: String,
    /// Detector confidence (0.0 - 1.0), zero when not found.
    #[serde(skip)]
    pub confidence: f32,
}

impl FieldResult {
    /// Create a found result, degrading to not found when `content` is blank.
    pub fn found(field_name: impl Into<String>, content: impl Into<String>, confidence: f32) -> Self {
        let field_name = field_name.into();
        let content = content.into().trim().to_string();

        if content.is_empty() {
            return Self::not_found(field_name);
        }

        Self {
            field_name,
            found: true,
            content,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Create a not-found result.
    pub fn not_found(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            found: false,
            content: String::new(),
            confidence: 0.0,
        }
    }

    /// Build a result from an optional value.
    pub fn from_option(field_name: impl Into<String>, value: Option<(String, f32)>) -> Self {
        match value {
            Some((content, confidence)) => Self::found(field_name, content, confidence),
            None => Self::not_found(field_name),
        }
    }
}

/// How composite sub-fields are rendered in JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubfieldLayout {
    /// `"name": "Dr. Jane Smith"`
    Inline,
    /// `"phone": {"found": true, "content": "..."}`
    Nested,
}

/// A composite detection made of named flat sub-results.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeResult {
    pub field_name: String,
    pub layout: SubfieldLayout,
    /// Sub-results in declaration order.
    pub subfields: Vec<FieldResult>,
}

/// Universal detector output.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionResult {
    Flat(FieldResult),
    Composite(CompositeResult),
}

impl DetectionResult {
    /// Flat not-found result.
    pub fn missing(field_name: impl Into<String>) -> Self {
        DetectionResult::Flat(FieldResult::not_found(field_name))
    }

    /// Composite result from sub-results, in the given order.
    pub fn composite(
        field_name: impl Into<String>,
        layout: SubfieldLayout,
        subfields: Vec<FieldResult>,
    ) -> Self {
        DetectionResult::Composite(CompositeResult {
            field_name: field_name.into(),
            layout,
            subfields,
        })
    }

    /// A not-found result with the same shape as this one.
    pub fn cleared(&self) -> Self {
        match self {
            DetectionResult::Flat(flat) => DetectionResult::missing(flat.field_name.clone()),
            DetectionResult::Composite(composite) => DetectionResult::composite(
                composite.field_name.clone(),
                composite.layout,
                composite
                    .subfields
                    .iter()
                    .map(|sub| FieldResult::not_found(sub.field_name.clone()))
                    .collect(),
            ),
        }
    }

    pub fn field_name(&self) -> &str {
        match self {
            DetectionResult::Flat(flat) => &flat.field_name,
            DetectionResult::Composite(composite) => &composite.field_name,
        }
    }

    /// True if the field (or any sub-field) was found.
    pub fn is_found(&self) -> bool {
        match self {
            DetectionResult::Flat(flat) => flat.found,
            DetectionResult::Composite(composite) => composite.subfields.iter().any(|s| s.found),
        }
    }

    /// Display content. Composites render found sub-fields as `key: value` lines.
    pub fn content(&self) -> String {
        match self {
            DetectionResult::Flat(flat) => flat.content.clone(),
            DetectionResult::Composite(composite) => composite
                .subfields
                .iter()
                .filter(|s| s.found)
                .map(|s| format!("{}: {}", s.field_name, s.content))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Look up a sub-field of a composite result.
    pub fn subfield(&self, name: &str) -> Option<&FieldResult> {
        match self {
            DetectionResult::Flat(_) => None,
            DetectionResult::Composite(composite) => {
                composite.subfields.iter().find(|s| s.field_name == name)
            }
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, DetectionResult::Composite(_))
    }

    /// Highest confidence among found parts.
    pub fn confidence(&self) -> f32 {
        match self {
            DetectionResult::Flat(flat) => flat.confidence,
            DetectionResult::Composite(composite) => composite
                .subfields
                .iter()
                .map(|s| s.confidence)
                .fold(0.0, f32::max),
        }
    }
}

impl From<FieldResult> for DetectionResult {
    fn from(result: FieldResult) -> Self {
        DetectionResult::Flat(result)
    }
}

#[derive(Serialize)]
struct NestedSubfield<'a> {
    found: bool,
    content: &'a str,
}

impl Serialize for DetectionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DetectionResult::Flat(flat) => flat.serialize(serializer),
            DetectionResult::Composite(composite) => {
                let mut map = serializer.serialize_map(Some(composite.subfields.len() + 2))?;
                map.serialize_entry("field_name", &composite.field_name)?;
                map.serialize_entry("found", &self.is_found())?;
                for sub in &composite.subfields {
                    match composite.layout {
                        SubfieldLayout::Inline => map.serialize_entry(&sub.field_name, &sub.content)?,
                        SubfieldLayout::Nested => map.serialize_entry(
                            &sub.field_name,
                            &NestedSubfield {
                                found: sub.found,
                                content: &sub.content,
                            },
                        )?,
                    }
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_content_is_not_found() {
        let result = FieldResult::found("email", "   \n ", 0.9);
        assert!(!result.found);
        assert_eq!(result.content, "");
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_found_content_is_trimmed() {
        let result = FieldResult::found("email", "  prof@school.edu\n", 0.9);
        assert!(result.found);
        assert_eq!(result.content, "prof@school.edu");
    }

    #[test]
    fn test_flat_serialization() {
        let result = DetectionResult::from(FieldResult::found("modality", "Online", 0.8));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"field_name": "modality", "found": true, "content": "Online"})
        );
    }

    #[test]
    fn test_inline_composite_serialization() {
        let result = DetectionResult::composite(
            "instructor",
            SubfieldLayout::Inline,
            vec![
                FieldResult::found("name", "Jane Smith", 0.9),
                FieldResult::not_found("title"),
                FieldResult::not_found("department"),
            ],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "field_name": "instructor",
                "found": true,
                "name": "Jane Smith",
                "title": "",
                "department": ""
            })
        );
    }

    #[test]
    fn test_nested_composite_serialization() {
        let result = DetectionResult::composite(
            "office_information",
            SubfieldLayout::Nested,
            vec![FieldResult::found("phone", "(603) 555-1234", 0.95)],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["phone"]["found"], true);
        assert_eq!(json["phone"]["content"], "(603) 555-1234");
    }

    #[test]
    fn test_cleared_keeps_shape() {
        let result = DetectionResult::composite(
            "office_information",
            SubfieldLayout::Nested,
            vec![
                FieldResult::found("office_location", "Room 101", 0.8),
                FieldResult::found("phone", "555-1234", 0.9),
            ],
        );
        let cleared = result.cleared();
        assert!(!cleared.is_found());
        assert_eq!(cleared.content(), "");
        assert!(cleared.subfield("phone").is_some());
        assert!(!cleared.subfield("phone").unwrap().found);
    }

    #[test]
    fn test_composite_content_lines() {
        let result = DetectionResult::composite(
            "instructor",
            SubfieldLayout::Inline,
            vec![
                FieldResult::found("name", "Jane Smith", 0.9),
                FieldResult::found("title", "Lecturer", 0.8),
            ],
        );
        assert_eq!(result.content(), "name: Jane Smith\ntitle: Lecturer");
    }
}
