use pretty_assertions::assert_eq;
use serde_json::json;

use syllabus_core::eval::{parse_corpus, FIELD_SPECS};
use syllabus_core::{
    AccuracyReport, DetectionMap, DetectorRegistry, Evaluator, FieldResult, GroundTruthRecord,
};

fn predicted(pairs: &[(&str, &str)]) -> DetectionMap {
    pairs
        .iter()
        .map(|(field, content)| (field.to_string(), FieldResult::found(*field, *content, 0.9).into()))
        .collect()
}

#[test]
fn test_presence_sentinel_matches_any_text() {
    let record = GroundTruthRecord::new("syllabus.pdf").with_field("final_grade_scale", json!(true));
    let report = Evaluator::default()
        .score(&record, &predicted(&[("final_grade_scale", "A: 90-100, B: 80-89")]))
        .into_report(true);

    assert_eq!(report.summary["final_grade_scale"].correct, 1);
    assert!(report.details[0].fields["final_grade_scale"].matched);
}

#[test]
fn test_presence_semantics_table() {
    let evaluator = Evaluator::default();
    let cases = [
        (json!(true), "A: 90-100", true),
        (json!(true), "", false),
        (json!(""), "", true),
        (json!(""), "A: 90-100", false),
    ];

    for (truth, content, expected) in cases {
        let record = GroundTruthRecord::new("doc").with_field("final_grade_scale", truth);
        let detections = if content.is_empty() {
            DetectionMap::new()
        } else {
            predicted(&[("final_grade_scale", content)])
        };
        let report = evaluator.score(&record, &detections);
        assert_eq!(report.stats["final_grade_scale"].correct == 1, expected);
    }
}

#[test]
fn test_corpus_run_end_to_end() {
    let corpus = json!([
        {
            "filename": "bio.txt",
            "email": "jane.smith@school.edu",
            "SLOs": "Describe cells",
            "modality": "In person",
            "final_grade_scale": "",
            "instructor": {"name": "Jane Smith"}
        },
        {
            "filename": "chem.txt",
            "email": "",
            "SLOs": "",
            "phone": "(603) 555-1234"
        }
    ]);
    let documents = [
        (
            "bio.txt",
            "Instructor: Dr. Jane Smith\nEmail: jane.smith@school.edu\n\n\
             Class meetings: Tuesdays and Thursdays 9:40 - 11:00 am, Room 204.\n\n\
             Student Learning Outcomes:\n• Describe the structure of cells.\n• Interpret data.",
        ),
        ("chem.txt", "Phone: (603) 555-1234\nSLOs are important for course design."),
    ];

    let registry = DetectorRegistry::new();
    let evaluator = Evaluator::default();
    let records = parse_corpus(&corpus).unwrap();

    // One partial report per document, combined afterwards.
    let report = records
        .iter()
        .zip(documents.iter())
        .map(|(record, (_, text))| evaluator.evaluate_text(&registry, record, text))
        .fold(AccuracyReport::new(), AccuracyReport::merge)
        .into_report(true);

    assert_eq!(report.summary["email"].correct, 2);
    assert_eq!(report.summary["slo"].correct, 2);
    assert_eq!(report.summary["modality"].correct, 1);
    assert_eq!(report.summary["phone"].correct, 1);
    assert_eq!(report.summary["final_grade_scale"].total, 1);
    assert_eq!(report.summary["instructor.name"].total, 1);
    assert_eq!(report.summary["workload"].total, 0);
    assert_eq!(report.details.len(), 2);
    assert_eq!(report.details[0].document_id, "bio.txt");
}

#[test]
fn test_merge_order_does_not_change_totals() {
    let evaluator = Evaluator::default();
    let a = evaluator.score(
        &GroundTruthRecord::new("a").with_field("email", json!("a@x.edu")),
        &predicted(&[("email", "a@x.edu")]),
    );
    let b = evaluator.score(
        &GroundTruthRecord::new("b").with_field("email", json!("b@x.edu")),
        &DetectionMap::new(),
    );

    let forward = a.clone().merge(b.clone()).into_report(true);
    let backward = b.merge(a).into_report(true);
    assert_eq!(forward, backward);
    assert_eq!(forward.overall.accuracy, 0.5);
}

#[test]
fn test_type_mismatch_does_not_abort() {
    let mut detections = predicted(&[("email", "x@y.edu")]);
    detections.insert("instructor".to_string(), FieldResult::found("instructor", "Jane", 0.5).into());

    let record = GroundTruthRecord::new("doc")
        .with_field("instructor", json!({"name": "Jane"}))
        .with_field("email", json!("x@y.edu"));
    let report = Evaluator::default().score(&record, &detections).into_report(true);

    assert_eq!(report.summary["email"].correct, 1);
    assert_eq!(report.summary["instructor.name"].total, 1);
    assert_eq!(report.summary["instructor.name"].correct, 0);
    assert!(report.details[0].fields["instructor.name"].error.is_some());
    assert!(!report.summary.contains_key("instructor"));
}

#[test]
fn test_summary_covers_declared_fields() {
    let report = AccuracyReport::new().into_report(true);
    for spec in FIELD_SPECS {
        let present = report.summary.keys().any(|k| k == spec.key || k.starts_with(&format!("{}.", spec.key)));
        assert!(present, "missing {}", spec.key);
    }
    assert_eq!(report.overall.total, 0);
}
