//! List/type normalization of structured extraction values.
//!
//! Upstream extraction can hand back strings, lists or maps for a field.
//! Everything downstream compares strings, so values are canonicalized here
//! without dropping any element.

use std::collections::BTreeMap;

use serde_json::Value;

/// A field value as it arrives from a structured extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<FieldValue>),
    /// Entries in insertion order.
    Map(Vec<(String, FieldValue)>),
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Text(String::new()),
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            Value::Number(n) => FieldValue::Text(n.to_string()),
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Array(items) => FieldValue::List(items.iter().map(FieldValue::from).collect()),
            Value::Object(map) => FieldValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Delimiter used when a list collapses to one string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPolicy {
    /// One item per line.
    Lines,
    /// `", "` for categorical fields.
    Comma,
}

impl JoinPolicy {
    pub fn delimiter(self) -> &'static str {
        match self {
            JoinPolicy::Lines => "\n",
            JoinPolicy::Comma => ", ",
        }
    }
}

const COMMA_FIELDS: &[&str] = &[
    "assignment_types",
    "assignment_types_title",
    "assignment_delivery",
    "modality",
    "preferred_contact",
    "credit_hours",
];

/// Join policy for a field.
pub fn join_policy(field: &str) -> JoinPolicy {
    if COMMA_FIELDS.contains(&field) {
        JoinPolicy::Comma
    } else {
        JoinPolicy::Lines
    }
}

impl FieldValue {
    /// Render as a single string using `policy` for lists.
    pub fn render(&self, policy: JoinPolicy) -> String {
        match self {
            FieldValue::Text(s) => s.trim().to_string(),
            FieldValue::List(items) => items
                .iter()
                .map(|item| item.render(policy))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(policy.delimiter()),
            FieldValue::Map(entries) => entries
                .iter()
                .map(|(key, value)| {
                    // Nested maps stay on their key's line.
                    let rendered = match value {
                        FieldValue::Map(_) => value.render(policy).replace('\n', "; "),
                        _ => value.render(policy),
                    };
                    format!("{}: {}", key, rendered)
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Canonical string form of one field value.
pub fn canonicalize(field: &str, value: &Value) -> String {
    FieldValue::from(value).render(join_policy(field))
}

/// Canonicalize every field of a structured extraction.
///
/// Non-object input yields an empty map.
pub fn normalize_extraction(extraction: &Value) -> BTreeMap<String, String> {
    extraction
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(field, value)| (field.clone(), canonicalize(field, value)))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_list_joined_per_policy() {
        let outcomes = json!(["Analyze data", "Write reports"]);
        assert_eq!(canonicalize("slo", &outcomes), "Analyze data\nWrite reports");

        let types = json!(["Quizzes", "Exams", "Projects"]);
        assert_eq!(canonicalize("assignment_types", &types), "Quizzes, Exams, Projects");
    }

    #[test]
    fn test_map_becomes_key_value_lines() {
        let scale = json!({"A": "90-100", "B": "80-89"});
        assert_eq!(canonicalize("final_grade_scale", &scale), "A: 90-100\nB: 80-89");
    }

    #[test]
    fn test_empty_collections_are_empty() {
        assert_eq!(canonicalize("slo", &json!([])), "");
        assert_eq!(canonicalize("final_grade_scale", &json!({})), "");
        assert_eq!(canonicalize("email", &Value::Null), "");
    }

    #[test]
    fn test_scalars_stringified() {
        assert_eq!(canonicalize("credit_hours", &json!(3)), "3");
        assert_eq!(canonicalize("email", &json!("  prof@school.edu ")), "prof@school.edu");
    }

    #[test]
    fn test_nested_values_kept() {
        let value = json!({"Exams": ["Midterm", "Final"], "Weights": {"Exams": "50%"}});
        assert_eq!(
            canonicalize("grading_process", &value),
            "Exams: Midterm\nFinal\nWeights: Exams: 50%"
        );
    }

    #[test]
    fn test_join_then_split_recovers_items() {
        let items = vec!["Quizzes", "Midterm exam", "Final project"];
        for field in ["slo", "assignment_types"] {
            let joined = canonicalize(field, &json!(items));
            let split: Vec<&str> = joined
                .split(join_policy(field).delimiter())
                .map(str::trim)
                .collect();
            assert_eq!(split, items);
        }
    }

    #[test]
    fn test_normalize_extraction() {
        let extraction = json!({
            "slo": ["One", "Two"],
            "email": "prof@school.edu",
            "office_hours": null
        });
        let normalized = normalize_extraction(&extraction);
        assert_eq!(normalized["slo"], "One\nTwo");
        assert_eq!(normalized["email"], "prof@school.edu");
        assert_eq!(normalized["office_hours"], "");
        assert!(normalize_extraction(&json!("text")).is_empty());
    }
}
