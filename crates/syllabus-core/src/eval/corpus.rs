//! Ground-truth corpus loading.
//!
//! A corpus is either a JSON array of records, each carrying its document id
//! under `filename`, `document_id` or `id`, or a JSON object mapping document
//! ids to records.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use super::compare::normalize_for_compare;
use crate::error::EvaluationError;
use crate::postprocess::canonicalize;

/// Keys that may carry the document id of an array record.
pub const ID_KEYS: &[&str] = &["filename", "document_id", "id"];

/// Corpus strings that mean "must be absent".
const ABSENT_MARKERS: &[&str] = &["", "not found", "missing"];

/// One labeled document.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundTruthRecord {
    pub document_id: String,
    /// Expected values by corpus field key, id keys removed.
    pub fields: BTreeMap<String, Value>,
}

impl GroundTruthRecord {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}

/// What the corpus expects for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    /// Some non-empty value should be detected.
    Present,
    /// Nothing should be detected.
    Absent,
    /// A specific value should be detected.
    Value(String),
    /// Per-sub-field expectations of a composite field.
    Structured(BTreeMap<String, Expectation>),
}

impl Expectation {
    /// Interpret a raw corpus value for `field`.
    ///
    /// Objects become [`Expectation::Structured`] only when `structured` is
    /// set; otherwise lists and objects collapse through the list normalizer.
    pub fn parse(field: &str, value: &Value, structured: bool) -> Self {
        match value {
            Value::Bool(true) => Expectation::Present,
            Value::Bool(false) | Value::Null => Expectation::Absent,
            Value::Object(map) if structured => Expectation::Structured(
                map.iter()
                    .map(|(sub, v)| (sub.clone(), Expectation::parse(sub, v, false)))
                    .collect(),
            ),
            other => Self::from_text(canonicalize(field, other)),
        }
    }

    fn from_text(text: String) -> Self {
        if ABSENT_MARKERS.contains(&normalize_for_compare(&text).as_str()) {
            Expectation::Absent
        } else {
            Expectation::Value(text)
        }
    }

    /// Whether this expectation asks for a non-empty detection.
    pub fn is_present(&self) -> bool {
        match self {
            Expectation::Present => true,
            Expectation::Absent => false,
            Expectation::Value(text) => !normalize_for_compare(text).is_empty(),
            Expectation::Structured(subs) => subs.values().any(Expectation::is_present),
        }
    }

    /// Short shape name used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Expectation::Present | Expectation::Absent => "presence",
            Expectation::Value(_) => "string",
            Expectation::Structured(_) => "structured",
        }
    }
}

/// Parse a corpus from JSON.
pub fn parse_corpus(value: &Value) -> Result<Vec<GroundTruthRecord>, EvaluationError> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let object = item.as_object().ok_or_else(|| {
                    EvaluationError::Corpus(format!("record {} is not an object", i + 1))
                })?;
                let document_id = ID_KEYS
                    .iter()
                    .find_map(|key| object.get(*key).and_then(id_string))
                    .ok_or_else(|| {
                        EvaluationError::Corpus(format!(
                            "record {} has no document id ({})",
                            i + 1,
                            ID_KEYS.join(", ")
                        ))
                    })?;
                let fields = object
                    .iter()
                    .filter(|(key, _)| !ID_KEYS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                Ok(GroundTruthRecord { document_id, fields })
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(document_id, record)| {
                let object = record.as_object().ok_or_else(|| {
                    EvaluationError::Corpus(format!("record '{}' is not an object", document_id))
                })?;
                Ok(GroundTruthRecord {
                    document_id: document_id.clone(),
                    fields: object
                        .iter()
                        .map(|(key, value)| (key.clone(), value.clone()))
                        .collect(),
                })
            })
            .collect(),
        _ => Err(EvaluationError::Corpus(
            "expected an array of records or an object keyed by document id".to_string(),
        )),
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read and parse a corpus file.
pub fn load_corpus(path: &Path) -> crate::Result<Vec<GroundTruthRecord>> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    Ok(parse_corpus(&value)?)
}
