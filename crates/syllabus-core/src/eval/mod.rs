//! Ground-truth evaluation of detector output.
//!
//! [`Evaluator::score`] compares one document's detections with its corpus
//! record and returns a partial [`AccuracyReport`]. Partial reports from any
//! number of workers are combined with [`AccuracyReport::merge`].

pub mod compare;
pub mod corpus;
pub mod report;

pub use compare::{field_spec, loose_match, Comparison, FieldSpec, FIELD_SPECS};
pub use corpus::{load_corpus, parse_corpus, Expectation, GroundTruthRecord};
pub use report::{AccuracyReport, EvaluationReport, FieldComparison, FieldStats, FieldSummary};

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::detect::DetectorRegistry;
use crate::models::config::EvaluationConfig;
use crate::models::detection::DetectionMap;

/// Scores detections against ground truth.
#[derive(Debug, Clone)]
pub struct Evaluator {
    loose_threshold: f64,
}

impl Evaluator {
    pub fn new(config: &EvaluationConfig) -> Self {
        Self::with_threshold(config.loose_threshold)
    }

    pub fn with_threshold(loose_threshold: f64) -> Self {
        Self {
            loose_threshold: loose_threshold.clamp(0.0, 1.0),
        }
    }

    pub fn loose_threshold(&self) -> f64 {
        self.loose_threshold
    }

    /// Score one document. Corpus keys without a declared comparison are skipped.
    ///
    /// When a record carries both a field and one of its aliases, the
    /// canonical key wins and the alias is ignored with a warning.
    pub fn score(&self, record: &GroundTruthRecord, detected: &DetectionMap) -> AccuracyReport {
        let mut fields: BTreeMap<String, FieldComparison> = BTreeMap::new();

        for (key, ground_truth) in &record.fields {
            let Some(spec) = field_spec(key) else {
                debug!("{}: ignoring unknown field '{}'", record.document_id, key);
                continue;
            };
            if key != spec.key && record.fields.contains_key(spec.key) {
                warn!(
                    "{}: '{}' duplicates '{}', keeping '{}'",
                    record.document_id, key, spec.key, spec.key
                );
                continue;
            }
            for (scored_key, comparison) in
                compare::compare_field(spec, ground_truth, detected, self.loose_threshold)
            {
                if fields.contains_key(&scored_key) {
                    warn!("{}: '{}' scored twice, keeping the first", record.document_id, scored_key);
                    continue;
                }
                fields.insert(scored_key, comparison);
            }
        }

        let mut report = AccuracyReport::new();
        report.push_document(record.document_id.clone(), fields);
        report
    }

    /// Detect every field in `text` and score the result.
    pub fn evaluate_text(
        &self,
        registry: &DetectorRegistry,
        record: &GroundTruthRecord,
        text: &str,
    ) -> AccuracyReport {
        self.score(record, &registry.detect_all(text))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(&EvaluationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::detection::FieldResult;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn detected(pairs: &[(&str, &str)]) -> DetectionMap {
        pairs
            .iter()
            .map(|(field, content)| {
                (field.to_string(), FieldResult::found(*field, *content, 0.9).into())
            })
            .collect()
    }

    #[test]
    fn test_score_counts_declared_fields_only() {
        let record = GroundTruthRecord::new("doc.pdf")
            .with_field("email", json!("prof@school.edu"))
            .with_field("course_title", json!("Biology 101"));
        let report = Evaluator::default().score(&record, &detected(&[("email", "prof@school.edu")]));

        assert_eq!(report.stats.len(), 1);
        assert_eq!(report.stats["email"], FieldStats { correct: 1, total: 1 });
        assert_eq!(report.details[0].document_id, "doc.pdf");
    }

    #[test]
    fn test_presence_sentinel_ignores_text() {
        let record = GroundTruthRecord::new("doc").with_field("final_grade_scale", json!(true));
        let report = Evaluator::default()
            .score(&record, &detected(&[("final_grade_scale", "A: 90-100, B: 80-89")]));

        assert!(report.details[0].fields["final_grade_scale"].matched);
    }

    #[test]
    fn test_modality_compared_by_bucket() {
        let record = GroundTruthRecord::new("doc").with_field("modality", json!("Fully online"));
        let report = Evaluator::default().score(&record, &detected(&[("modality", "Online")]));
        assert_eq!(report.stats["modality"].correct, 1);
    }

    #[test]
    fn test_alias_does_not_override_canonical_key() {
        let record = GroundTruthRecord::new("doc")
            .with_field("instructor_email", json!("other@school.edu"))
            .with_field("email", json!("prof@school.edu"));
        let report = Evaluator::default().score(&record, &detected(&[("email", "prof@school.edu")]));

        assert_eq!(report.stats["email"], FieldStats { correct: 1, total: 1 });
        assert_eq!(report.details[0].fields["email"].ground_truth, json!("prof@school.edu"));
    }

    #[test]
    fn test_threshold_clamped() {
        assert_eq!(Evaluator::with_threshold(1.7).loose_threshold(), 1.0);
        assert_eq!(Evaluator::with_threshold(-1.0).loose_threshold(), 0.0);
    }
}
