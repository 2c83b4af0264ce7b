use pretty_assertions::assert_eq;

use syllabus_core::detect::registry::field_names;
use syllabus_core::detect::DetectorRegistry;
use syllabus_core::{detect_all, DetectionConfig, DetectionResult};

const SYLLABUS: &str = "BIOL 401: Cell Biology\n\
Instructor: Dr. Jane Smith\n\
Email: jane.smith@school.edu\n\
Phone: (603) 555-1234\n\
\n\
Class meetings: Tuesdays and Thursdays 9:40 - 11:00 am, Room 204.\n\
\n\
Student Learning Outcomes:\n\
• Describe the structure of cells.\n\
• Interpret experimental data.\n\
• Communicate findings in writing.\n\
\n\
Late Work Policy:\n\
Assignments lose 10% per day late.\n\
\n\
Grading Policy:\n\
Exam 1 - 30%\n\
Exam 2 - 30%\n\
Quizzes - 40%\n";

/// Every detector output keeps `found` and `content` in agreement.
fn assert_consistent(result: &DetectionResult) {
    assert_eq!(
        result.is_found(),
        !result.content().trim().is_empty(),
        "inconsistent result for {}",
        result.field_name()
    );
}

#[test]
fn test_slo_header_with_bullets() {
    let text = "Student Learning Outcomes:\n\
                • Describe the structure of cells.\n\
                • Interpret experimental data.\n\
                • Communicate findings in writing.";
    let results = detect_all(text);

    assert!(results["slo"].is_found());
    assert_eq!(
        results["slo"].content(),
        "Describe the structure of cells.\nInterpret experimental data.\nCommunicate findings in writing."
    );
}

#[test]
fn test_slo_casual_mention() {
    let results = detect_all("SLOs are important for course design.");
    assert!(!results["slo"].is_found());
    assert_eq!(results["slo"].content(), "");
}

#[test]
fn test_phone_number() {
    let results = detect_all("Phone: (603) 555-1234");
    assert!(results["phone"].is_found());
    assert_eq!(results["phone"].content(), "(603) 555-1234");
}

#[test]
fn test_phone_availability_phrase() {
    let results = detect_all("Telephone contact should be used as a secondary method");
    assert_eq!(results["phone"].content(), "Phone contact available");
}

#[test]
fn test_bare_email_is_not_a_response_time() {
    let results = detect_all("Email: prof@school.edu");
    assert!(!results["response_time"].is_found());
    assert!(results["email"].is_found());
}

#[test]
fn test_room_and_meeting_time_is_in_person() {
    let results = detect_all("Class meetings: Tuesdays and Thursdays 9:40 - 11:00 am, Room 204.");
    assert_eq!(results["modality"].content(), "In-Person");
}

#[test]
fn test_every_field_reported() {
    let results = detect_all(SYLLABUS);
    let names: Vec<&str> = results.keys().map(String::as_str).collect();
    let mut expected = field_names();
    expected.sort_unstable();
    assert_eq!(names, expected);
}

#[test]
fn test_found_iff_content() {
    let inputs = ["", "   \n\t", SYLLABUS, "SLOs are important.", "Room 204\nPhone calls by appointment."];
    for text in inputs {
        for result in detect_all(text).values() {
            assert_consistent(result);
        }
    }
}

#[test]
fn test_detection_is_idempotent() {
    let registry = DetectorRegistry::new();
    assert_eq!(registry.detect_all(SYLLABUS), registry.detect_all(SYLLABUS));
}

#[test]
fn test_full_document() {
    let results = detect_all(SYLLABUS);

    assert_eq!(results["email"].content(), "jane.smith@school.edu");
    assert_eq!(results["phone"].content(), "(603) 555-1234");
    assert_eq!(results["modality"].content(), "In-Person");
    assert!(results["slo"].content().starts_with("Describe the structure of cells."));
    assert!(results["late_work"].content().starts_with("Late Work Policy:"));
    assert!(results["instructor"].is_composite());
    assert!(results["office_information"].is_composite());
}

#[test]
fn test_header_preferred_over_casual_mention() {
    let text = "Late assignments will receive a 10% penalty.\n\n\
                LATE SUBMISSIONS\n\
                Email me before the deadline.";
    let results = detect_all(text);
    assert!(results["late_work"].content().starts_with("LATE SUBMISSIONS"));
}

#[test]
fn test_grading_heading_preferred_over_prose() {
    let text = "Grades are posted weekly and grading questions go to the TA.\n\n\
                Grading Policy:\n\
                Exams 50%\n\
                Labs 50%";
    let results = detect_all(text);
    assert_eq!(results["grading_procedures_title"].content(), "Grading Policy:");
}

#[test]
fn test_slo_header_preferred_over_mention() {
    let text = "Course objectives are reviewed every year.\n\n\
                Course Objectives:\n\
                - Analyze experimental data.";
    let results = detect_all(text);
    assert_eq!(results["slo"].content(), "Analyze experimental data.");
}

#[test]
fn test_composite_shape_in_json() {
    let results = detect_all("");
    let json = serde_json::to_value(&results).unwrap();

    assert_eq!(
        json["instructor"],
        serde_json::json!({
            "field_name": "instructor",
            "found": false,
            "name": "",
            "title": "",
            "department": ""
        })
    );
    assert_eq!(json["office_information"]["phone"]["found"], false);
    assert_eq!(json["office_information"]["office_hours"]["content"], "");
    assert_eq!(
        json["email"],
        serde_json::json!({"field_name": "email", "found": false, "content": ""})
    );
}

#[test]
fn test_disabled_detector_still_reported() {
    let config = DetectionConfig {
        disabled: vec!["email".to_string()],
        ..Default::default()
    };
    let registry = DetectorRegistry::from_config(&config);
    let analysis = registry.analyze("Email: prof@school.edu");

    assert!(!analysis.fields["email"].is_found());
    assert_eq!(analysis.unavailable, vec!["email".to_string()]);
    assert!(analysis.missing.contains(&"email".to_string()));
}
