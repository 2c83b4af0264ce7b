//! Field comparison semantics.
//!
//! Each corpus field has one fixed [`Comparison`] declared in
//! [`FIELD_SPECS`]. Flat fields compare one detected string, composite
//! fields compare each sub-field on its own.

use serde_json::Value;
use strsim::normalized_levenshtein;
use tracing::{debug, warn};

use super::corpus::Expectation;
use super::report::FieldComparison;
use crate::detect::detectors::{
    assignment_delivery, class_location, credit_hours, email, final_grade_scale, grading_process,
    headings, instructor, late_work, modality, office, phone, preferred_contact, response_time,
    slo, workload,
};
use crate::error::EvaluationError;
use crate::models::detection::{DetectionMap, DetectionResult};

/// Value mapping applied before an exact comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canonical {
    None,
    /// Collapse delivery descriptions to online/hybrid/in-person.
    Modality,
}

impl Canonical {
    pub fn apply(self, text: &str) -> String {
        let text = normalize_for_compare(text);
        match self {
            Canonical::None => text,
            Canonical::Modality => modality_bucket(&text),
        }
    }
}

/// How a field is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Exact(Canonical),
    Loose,
    /// Only presence matters, not the text.
    Presence,
    /// Sub-fields compared loosely, one entry each.
    Structured(&'static [&'static str]),
}

/// Where the detected value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Field(&'static str),
    Subfield(&'static str, &'static str),
}

/// A scored corpus field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Report key.
    pub key: &'static str,
    /// Other corpus keys accepted for this field.
    pub aliases: &'static [&'static str],
    pub target: Target,
    pub comparison: Comparison,
}

const fn loose(key: &'static str, field: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        aliases: &[],
        target: Target::Field(field),
        comparison: Comparison::Loose,
    }
}

const fn sub(key: &'static str, aliases: &'static [&'static str], field: &'static str, subfield: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        aliases,
        target: Target::Subfield(field, subfield),
        comparison: Comparison::Loose,
    }
}

/// Every corpus field the evaluator understands.
pub static FIELD_SPECS: &[FieldSpec] = &[
    FieldSpec {
        key: modality::FIELD,
        aliases: &[],
        target: Target::Field(modality::FIELD),
        comparison: Comparison::Exact(Canonical::Modality),
    },
    FieldSpec {
        key: slo::FIELD,
        aliases: &["SLOs", "slos"],
        target: Target::Field(slo::FIELD),
        comparison: Comparison::Presence,
    },
    FieldSpec {
        key: email::FIELD,
        aliases: &["instructor_email"],
        target: Target::Field(email::FIELD),
        comparison: Comparison::Loose,
    },
    FieldSpec {
        key: credit_hours::FIELD,
        aliases: &["credit_hour"],
        target: Target::Field(credit_hours::FIELD),
        comparison: Comparison::Loose,
    },
    loose(workload::FIELD, workload::FIELD),
    FieldSpec {
        key: instructor::FIELD,
        aliases: &[],
        target: Target::Field(instructor::FIELD),
        comparison: Comparison::Structured(instructor::SUBFIELDS),
    },
    sub("instructor_name", &[], instructor::FIELD, instructor::NAME),
    sub("instructor_title", &[], instructor::FIELD, instructor::TITLE),
    sub("instructor_department", &[], instructor::FIELD, instructor::DEPARTMENT),
    FieldSpec {
        key: office::FIELD,
        aliases: &[],
        target: Target::Field(office::FIELD),
        comparison: Comparison::Structured(office::SUBFIELDS),
    },
    sub("office_address", &[office::LOCATION], office::FIELD, office::LOCATION),
    sub(office::HOURS, &[], office::FIELD, office::HOURS),
    sub("office_phone", &[], office::FIELD, office::PHONE),
    loose(phone::FIELD, phone::FIELD),
    loose(response_time::FIELD, response_time::FIELD),
    loose(class_location::FIELD, class_location::FIELD),
    loose(headings::ASSIGNMENT_TYPES, headings::ASSIGNMENT_TYPES),
    loose(headings::GRADING_PROCEDURES, headings::GRADING_PROCEDURES),
    FieldSpec {
        key: late_work::FIELD,
        aliases: &["deadline_expectations_title"],
        target: Target::Field(late_work::FIELD),
        comparison: Comparison::Loose,
    },
    loose(assignment_delivery::FIELD, assignment_delivery::FIELD),
    FieldSpec {
        key: final_grade_scale::FIELD,
        aliases: &[],
        target: Target::Field(final_grade_scale::FIELD),
        comparison: Comparison::Presence,
    },
    loose(preferred_contact::FIELD, preferred_contact::FIELD),
    FieldSpec {
        key: grading_process::FIELD,
        aliases: &[],
        target: Target::Field(grading_process::FIELD),
        comparison: Comparison::Presence,
    },
];

/// Comparison entry for a corpus key or alias.
pub fn field_spec(corpus_key: &str) -> Option<&'static FieldSpec> {
    FIELD_SPECS
        .iter()
        .find(|spec| spec.key == corpus_key || spec.aliases.contains(&corpus_key))
}

/// Every report key, with structured fields expanded to `field.sub`.
pub fn declared_keys() -> Vec<String> {
    FIELD_SPECS
        .iter()
        .flat_map(|spec| match spec.comparison {
            Comparison::Structured(subs) => subs.iter().map(|s| sub_key(spec.key, s)).collect(),
            _ => vec![spec.key.to_string()],
        })
        .collect()
}

fn sub_key(field: &str, sub: &str) -> String {
    format!("{}.{}", field, sub)
}

/// Trim, case-fold and collapse whitespace.
pub fn normalize_for_compare(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Tolerant string match.
///
/// Both empty match, one empty does not. Equality or containment either way
/// matches; otherwise normalized edit similarity must reach `threshold`.
pub fn loose_match(expected: &str, predicted: &str, threshold: f64) -> bool {
    let expected = normalize_for_compare(expected);
    let predicted = normalize_for_compare(predicted);

    match (expected.is_empty(), predicted.is_empty()) {
        (true, true) => return true,
        (true, false) | (false, true) => return false,
        _ => {}
    }

    if expected == predicted || expected.contains(&predicted) || predicted.contains(&expected) {
        return true;
    }

    normalized_levenshtein(&expected, &predicted) >= threshold
}

/// Presence semantics: the text itself is irrelevant.
pub fn presence_match(expected_present: bool, predicted: &str) -> bool {
    expected_present == !normalize_for_compare(predicted).is_empty()
}

/// Delivery bucket of a modality description.
pub fn modality_bucket(text: &str) -> String {
    let text = normalize_for_compare(text);
    if ["hybrid", "blended", "hy-flex", "hyflex"].iter().any(|k| text.contains(k)) {
        "hybrid".to_string()
    } else if ["online", "remote", "asynchronous"].iter().any(|k| text.contains(k)) {
        "online".to_string()
    } else if ["in-person", "in person", "on campus", "face-to-face"].iter().any(|k| text.contains(k)) {
        "in-person".to_string()
    } else {
        text
    }
}

/// Score one flat expectation against one detected string.
fn compare_flat(comparison: Comparison, expectation: &Expectation, predicted: &str, threshold: f64) -> bool {
    match (comparison, expectation) {
        (Comparison::Presence, _) | (_, Expectation::Present | Expectation::Absent) => {
            presence_match(expectation.is_present(), predicted)
        }
        (Comparison::Exact(canonical), Expectation::Value(expected)) => {
            canonical.apply(expected) == canonical.apply(predicted)
        }
        (_, Expectation::Value(expected)) => loose_match(expected, predicted, threshold),
        (_, Expectation::Structured(_)) => false,
    }
}

fn mismatch(key: String, ground_truth: &Value, expected: &str, predicted: &str, content: String) -> (String, FieldComparison) {
    let error = EvaluationError::ComparisonTypeMismatch {
        field: key.clone(),
        expected: expected.to_string(),
        predicted: predicted.to_string(),
    };
    warn!("{}", error);
    (
        key,
        FieldComparison {
            ground_truth: ground_truth.clone(),
            predicted: content,
            matched: false,
            error: Some(error.to_string()),
        },
    )
}

fn entry(key: String, ground_truth: &Value, predicted: String, matched: bool) -> (String, FieldComparison) {
    (
        key,
        FieldComparison {
            ground_truth: ground_truth.clone(),
            predicted,
            matched,
            error: None,
        },
    )
}

/// Compare one corpus value against the detections of its document.
///
/// Returns one entry per scored key. A shape mismatch is reported as a
/// failed entry carrying the error text.
pub fn compare_field(
    spec: &FieldSpec,
    ground_truth: &Value,
    detected: &DetectionMap,
    threshold: f64,
) -> Vec<(String, FieldComparison)> {
    let structured = matches!(spec.comparison, Comparison::Structured(_));
    let expectation = Expectation::parse(spec.key, ground_truth, structured);

    match spec.target {
        Target::Field(field) => match (spec.comparison, detected.get(field)) {
            (Comparison::Structured(subs), Some(DetectionResult::Composite(_)) | None) => {
                let result = detected.get(field);
                compare_structured(spec, subs, &expectation, ground_truth, result, threshold)
            }
            (Comparison::Structured(subs), Some(flat @ DetectionResult::Flat(_))) => {
                per_subfield(spec, subs, &expectation, ground_truth, |key, truth| {
                    mismatch(key, truth, expectation.kind(), "flat", flat.content())
                })
            }
            (_, Some(composite @ DetectionResult::Composite(_))) => {
                vec![mismatch(spec.key.to_string(), ground_truth, expectation.kind(), "structured", composite.content())]
            }
            (comparison, result) => {
                let predicted = result.map(DetectionResult::content).unwrap_or_default();
                let matched = compare_flat(comparison, &expectation, &predicted, threshold);
                vec![entry(spec.key.to_string(), ground_truth, predicted, matched)]
            }
        },
        Target::Subfield(field, subfield) => match detected.get(field) {
            Some(flat @ DetectionResult::Flat(_)) => {
                vec![mismatch(spec.key.to_string(), ground_truth, "structured", "flat", flat.content())]
            }
            result => {
                let predicted = result
                    .and_then(|r| r.subfield(subfield))
                    .map(|s| s.content.clone())
                    .unwrap_or_default();
                let matched = compare_flat(spec.comparison, &expectation, &predicted, threshold);
                vec![entry(spec.key.to_string(), ground_truth, predicted, matched)]
            }
        },
    }
}

fn compare_structured(
    spec: &FieldSpec,
    subs: &[&str],
    expectation: &Expectation,
    ground_truth: &Value,
    result: Option<&DetectionResult>,
    threshold: f64,
) -> Vec<(String, FieldComparison)> {
    match expectation {
        Expectation::Structured(expected) => {
            for unknown in expected.keys().filter(|k| !subs.contains(&k.as_str())) {
                debug!("Ignoring unknown sub-field '{}' of '{}'", unknown, spec.key);
            }

            subs.iter()
                .filter_map(|sub| {
                    let sub_expectation = expected.get(*sub)?;
                    let predicted = result
                        .and_then(|r| r.subfield(sub))
                        .map(|s| s.content.clone())
                        .unwrap_or_default();
                    let matched = compare_flat(Comparison::Loose, sub_expectation, &predicted, threshold);
                    let sub_truth = ground_truth.get(*sub).cloned().unwrap_or(Value::Null);
                    Some(entry(sub_key(spec.key, sub), &sub_truth, predicted, matched))
                })
                .collect()
        }
        Expectation::Present | Expectation::Absent => {
            let predicted = result.map(DetectionResult::content).unwrap_or_default();
            let matched = presence_match(expectation.is_present(), &predicted);
            per_subfield(spec, subs, expectation, ground_truth, |key, truth| {
                entry(key, truth, predicted.clone(), matched)
            })
        }
        Expectation::Value(_) => {
            let predicted = result.map(DetectionResult::content).unwrap_or_default();
            per_subfield(spec, subs, expectation, ground_truth, |key, truth| {
                mismatch(key, truth, "string", "structured", predicted.clone())
            })
        }
    }
}

/// One entry per `field.sub` key a structured expectation covers, so
/// whole-field outcomes land on the same keys as sub-field comparisons.
fn per_subfield<F>(
    spec: &FieldSpec,
    subs: &[&str],
    expectation: &Expectation,
    ground_truth: &Value,
    mut make: F,
) -> Vec<(String, FieldComparison)>
where
    F: FnMut(String, &Value) -> (String, FieldComparison),
{
    let null = Value::Null;
    subs.iter()
        .filter_map(|sub| match expectation {
            Expectation::Structured(expected) => expected
                .contains_key(*sub)
                .then(|| make(sub_key(spec.key, sub), ground_truth.get(*sub).unwrap_or(&null))),
            _ => Some(make(sub_key(spec.key, sub), ground_truth)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::detection::{FieldResult, SubfieldLayout};
    use std::collections::BTreeMap;
    use serde_json::json;

    fn flat(field: &str, content: &str) -> (String, DetectionResult) {
        (field.to_string(), FieldResult::found(field, content, 0.9).into())
    }

    fn instructor_map() -> DetectionMap {
        let mut map = DetectionMap::new();
        map.insert(
            instructor::FIELD.to_string(),
            DetectionResult::composite(
                instructor::FIELD,
                SubfieldLayout::Inline,
                vec![
                    FieldResult::found(instructor::NAME, "Dr. Jane Smith", 0.9),
                    FieldResult::not_found(instructor::TITLE),
                    FieldResult::found(instructor::DEPARTMENT, "Department of Biology", 0.8),
                ],
            ),
        );
        map
    }

    #[test]
    fn test_loose_match_rules() {
        assert!(loose_match("", "  ", 0.8));
        assert!(!loose_match("x", "", 0.8));
        assert!(!loose_match("", "x", 0.8));
        assert!(loose_match("prof@school.edu", "Email: PROF@school.edu", 0.8));
        assert!(loose_match("Room 204", "room  204.", 0.8));
        assert!(!loose_match("Online", "In-Person", 0.8));
    }

    #[test]
    fn test_threshold_configurable() {
        assert!(loose_match("office hours mwf", "office hour mwf", 0.8));
        assert!(!loose_match("abcdef", "abcxyz", 0.8));
        assert!(loose_match("abcdef", "abcxyz", 0.5));
    }

    #[test]
    fn test_presence_ignores_text() {
        assert!(presence_match(true, "A: 90-100, B: 80-89"));
        assert!(!presence_match(true, ""));
        assert!(presence_match(false, " "));
        assert!(!presence_match(false, "anything"));
    }

    #[test]
    fn test_modality_buckets() {
        assert_eq!(modality_bucket("Fully Online (asynchronous)"), "online");
        assert_eq!(modality_bucket("Hybrid"), "hybrid");
        assert_eq!(modality_bucket("In-Person"), "in-person");
        assert_eq!(modality_bucket("Face-to-face"), "in-person");
    }

    #[test]
    fn test_alias_lookup() {
        assert_eq!(field_spec("SLOs").unwrap().key, slo::FIELD);
        assert_eq!(field_spec("deadline_expectations_title").unwrap().key, late_work::FIELD);
        assert_eq!(field_spec("credit_hour").unwrap().key, credit_hours::FIELD);
        assert!(field_spec("course_title").is_none());
    }

    #[test]
    fn test_declared_keys_expand_structured() {
        let keys = declared_keys();
        assert!(keys.contains(&"instructor.name".to_string()));
        assert!(keys.contains(&"office_information.phone".to_string()));
        assert!(!keys.contains(&"instructor".to_string()));
    }

    #[test]
    fn test_presence_field_accepts_value() {
        let spec = field_spec(final_grade_scale::FIELD).unwrap();
        let detected: DetectionMap = [flat(final_grade_scale::FIELD, "A: 90-100")].into_iter().collect();

        let entries = compare_field(spec, &json!("some scale"), &detected, 0.8);
        assert!(entries[0].1.matched);
    }

    #[test]
    fn test_structured_counts_subfields() {
        let spec = field_spec(instructor::FIELD).unwrap();
        let truth = json!({"name": "Jane Smith", "title": "", "department": "Chemistry"});

        let entries = compare_field(spec, &truth, &instructor_map(), 0.8);
        let matched: BTreeMap<String, bool> = entries.into_iter().map(|(k, c)| (k, c.matched)).collect();

        assert_eq!(matched.len(), 3);
        assert!(matched["instructor.name"]);
        assert!(matched["instructor.title"]);
        assert!(!matched["instructor.department"]);
    }

    #[test]
    fn test_flattened_subfield() {
        let spec = field_spec("instructor_name").unwrap();
        let entries = compare_field(spec, &json!("Dr. Jane Smith"), &instructor_map(), 0.8);
        assert_eq!(entries[0].0, "instructor_name");
        assert!(entries[0].1.matched);
    }

    #[test]
    fn test_type_mismatch_is_an_entry() {
        let spec = field_spec(instructor::FIELD).unwrap();
        let detected: DetectionMap = [flat(instructor::FIELD, "Jane Smith")].into_iter().collect();

        let entries = compare_field(spec, &json!({"name": "Jane Smith"}), &detected, 0.8);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "instructor.name");
        assert!(!entries[0].1.matched);
        assert!(entries[0].1.error.as_deref().unwrap().contains("type mismatch"));

        let entries = compare_field(spec, &json!("Jane Smith"), &instructor_map(), 0.8);
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["instructor.name", "instructor.title", "instructor.department"]);
        assert!(entries.iter().all(|(_, c)| c.error.is_some() && !c.matched));
    }

    #[test]
    fn test_structured_outcomes_use_declared_keys() {
        let declared = declared_keys();
        let spec = field_spec(office::FIELD).unwrap();
        let detected: DetectionMap = [flat(office::FIELD, "Room 12")].into_iter().collect();

        for truth in [json!({"office_hours": "MWF"}), json!("Room 12"), json!(true)] {
            for (key, _) in compare_field(spec, &truth, &detected, 0.8) {
                assert!(declared.contains(&key), "{} is not declared", key);
            }
            for (key, _) in compare_field(spec, &truth, &DetectionMap::new(), 0.8) {
                assert!(declared.contains(&key), "{} is not declared", key);
            }
        }
    }

    #[test]
    fn test_structured_presence_per_subfield() {
        let spec = field_spec(instructor::FIELD).unwrap();
        let entries = compare_field(spec, &json!(true), &instructor_map(), 0.8);
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|(_, c)| c.matched));
    }

    #[test]
    fn test_missing_prediction_is_empty() {
        let spec = field_spec(email::FIELD).unwrap();
        let entries = compare_field(spec, &json!("not found"), &DetectionMap::new(), 0.8);
        assert!(entries[0].1.matched);
        assert_eq!(entries[0].1.predicted, "");
    }
}
