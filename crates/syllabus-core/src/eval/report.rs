//! Accuracy counters and the serialized evaluation report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::compare::declared_keys;

/// Per-field counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStats {
    pub correct: usize,
    pub total: usize,
}

impl FieldStats {
    pub fn record(&mut self, matched: bool) {
        self.total += 1;
        if matched {
            self.correct += 1;
        }
    }

    /// Fraction correct, zero when nothing was scored.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    fn add(&mut self, other: FieldStats) {
        self.correct += other.correct;
        self.total += other.total;
    }
}

/// One scored field of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldComparison {
    /// Raw corpus value.
    pub ground_truth: Value,
    /// Detected content, empty when not found.
    pub predicted: String,
    pub matched: bool,
    /// Set when the comparison could not be made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Scored fields of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetail {
    pub document_id: String,
    pub fields: BTreeMap<String, FieldComparison>,
}

/// A document the run could not score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub document_id: String,
    pub reason: String,
}

/// Partial accuracy counts, combinable across workers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccuracyReport {
    pub stats: BTreeMap<String, FieldStats>,
    pub details: Vec<DocumentDetail>,
    pub skipped: Vec<SkippedDocument>,
}

impl AccuracyReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document's comparisons.
    pub fn push_document(&mut self, document_id: impl Into<String>, fields: BTreeMap<String, FieldComparison>) {
        for (key, comparison) in &fields {
            self.stats.entry(key.clone()).or_default().record(comparison.matched);
        }
        self.details.push(DocumentDetail {
            document_id: document_id.into(),
            fields,
        });
    }

    pub fn skip(&mut self, document_id: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedDocument {
            document_id: document_id.into(),
            reason: reason.into(),
        });
    }

    /// Combine with another partial report.
    pub fn merge(mut self, other: AccuracyReport) -> Self {
        for (key, stats) in other.stats {
            self.stats.entry(key).or_default().add(stats);
        }
        self.details.extend(other.details);
        self.skipped.extend(other.skipped);
        self
    }

    pub fn documents_scored(&self) -> usize {
        self.details.len()
    }

    /// Build the final report. Every declared field appears in the summary.
    pub fn into_report(self, include_details: bool) -> EvaluationReport {
        let mut summary: BTreeMap<String, FieldSummary> = declared_keys()
            .into_iter()
            .map(|key| (key, FieldSummary::from(FieldStats::default())))
            .collect();

        let mut overall = FieldStats::default();
        for (key, stats) in &self.stats {
            overall.add(*stats);
            summary.insert(key.clone(), FieldSummary::from(*stats));
        }

        let mut details = if include_details { self.details } else { Vec::new() };
        details.sort_by(|a, b| a.document_id.cmp(&b.document_id));

        let mut skipped = self.skipped;
        skipped.sort_by(|a, b| a.document_id.cmp(&b.document_id));

        EvaluationReport {
            summary,
            overall: FieldSummary::from(overall),
            details,
            skipped,
        }
    }
}

/// Counters plus accuracy rounded to four places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub correct: usize,
    pub total: usize,
    pub accuracy: f64,
}

impl From<FieldStats> for FieldSummary {
    fn from(stats: FieldStats) -> Self {
        Self {
            correct: stats.correct,
            total: stats.total,
            accuracy: (stats.accuracy() * 10_000.0).round() / 10_000.0,
        }
    }
}

/// Serialized result of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub summary: BTreeMap<String, FieldSummary>,
    pub overall: FieldSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DocumentDetail>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn comparison(matched: bool) -> FieldComparison {
        FieldComparison {
            ground_truth: json!("x"),
            predicted: "x".to_string(),
            matched,
            error: None,
        }
    }

    fn document(id: &str, email: bool) -> AccuracyReport {
        let mut report = AccuracyReport::new();
        let mut fields = BTreeMap::new();
        fields.insert("email".to_string(), comparison(email));
        report.push_document(id, fields);
        report
    }

    #[test]
    fn test_merge_sums_counts() {
        let merged = document("b", true).merge(document("a", false)).merge(document("c", true));
        assert_eq!(merged.stats["email"], FieldStats { correct: 2, total: 3 });
        assert_eq!(merged.documents_scored(), 3);
    }

    #[test]
    fn test_report_seeds_every_field() {
        let report = document("a", true).into_report(true);

        assert_eq!(report.summary["email"].total, 1);
        assert_eq!(report.summary["modality"], FieldSummary { correct: 0, total: 0, accuracy: 0.0 });
        assert_eq!(report.overall.total, 1);
    }

    #[test]
    fn test_details_sorted_and_optional() {
        let merged = document("b", true).merge(document("a", true));
        let report = merged.clone().into_report(true);
        let ids: Vec<&str> = report.details.iter().map(|d| d.document_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let report = merged.into_report(false);
        assert!(report.details.is_empty());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_accuracy_rounded() {
        let merged = document("a", true).merge(document("b", false)).merge(document("c", false));
        let report = merged.into_report(false);
        assert_eq!(report.summary["email"].accuracy, 0.3333);
        assert_eq!(report.overall.accuracy, 0.3333);
    }
}
