//! Explicit detector registry.
//!
//! The full detector set is a static table of field specs. Building a
//! registry constructs each detector; a detector that fails to construct, or
//! panics while scanning, only affects its own field, which is then reported
//! as not found with its usual shape.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::detectors::{
    assignment_delivery, class_location, credit_hours, email, final_grade_scale, grading_process,
    headings, instructor, late_work, modality, office, phone, preferred_contact, response_time,
    slo, workload, AssignmentDeliveryDetector, ClassLocationDetector, CreditHoursDetector,
    EmailDetector, FinalGradeScaleDetector, GradingProcessDetector, HeadingDetector,
    InstructorDetector, LateWorkDetector, ModalityDetector, OfficeDetector, PhoneDetector,
    PreferredContactDetector, ResponseTimeDetector, SloDetector, WorkloadDetector,
};
use super::normalize::truncate_chars;
use super::FieldDetector;
use crate::error::DetectorError;
use crate::models::config::DetectionConfig;
use crate::models::detection::{DetectionMap, DetectionResult, FieldResult, SubfieldLayout};

/// Output shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Flat,
    Composite(SubfieldLayout, &'static [&'static str]),
}

/// Builds one detector from configuration.
pub type DetectorFactory = fn(&DetectionConfig) -> Result<Box<dyn FieldDetector>, DetectorError>;

/// A registered field: its name, result shape and factory.
pub struct DetectorSpec {
    pub field: &'static str,
    pub shape: Shape,
    pub build: DetectorFactory,
}

impl DetectorSpec {
    /// Not-found result with this field's shape.
    pub fn empty_result(&self) -> DetectionResult {
        match self.shape {
            Shape::Flat => DetectionResult::missing(self.field),
            Shape::Composite(layout, subfields) => DetectionResult::composite(
                self.field,
                layout,
                subfields.iter().map(|s| FieldResult::not_found(*s)).collect(),
            ),
        }
    }
}

impl std::fmt::Debug for DetectorSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorSpec")
            .field("field", &self.field)
            .field("shape", &self.shape)
            .finish()
    }
}

fn boxed<D: FieldDetector + Default + 'static>(
    _config: &DetectionConfig,
) -> Result<Box<dyn FieldDetector>, DetectorError> {
    Ok(Box::new(D::default()))
}

fn build_slo(config: &DetectionConfig) -> Result<Box<dyn FieldDetector>, DetectorError> {
    Ok(Box::new(SloDetector::with_extra_headers(config.headers_for(slo::FIELD))?))
}

fn build_late_work(config: &DetectionConfig) -> Result<Box<dyn FieldDetector>, DetectorError> {
    Ok(Box::new(LateWorkDetector::with_extra_headers(config.headers_for(late_work::FIELD))?))
}

fn build_assignment_types(_config: &DetectionConfig) -> Result<Box<dyn FieldDetector>, DetectorError> {
    Ok(Box::new(HeadingDetector::assignment_types()))
}

fn build_grading_procedures(_config: &DetectionConfig) -> Result<Box<dyn FieldDetector>, DetectorError> {
    Ok(Box::new(HeadingDetector::grading_procedures()))
}

/// Every detector, in report order.
pub static DETECTOR_SPECS: &[DetectorSpec] = &[
    DetectorSpec {
        field: slo::FIELD,
        shape: Shape::Flat,
        build: build_slo,
    },
    DetectorSpec {
        field: email::FIELD,
        shape: Shape::Flat,
        build: boxed::<EmailDetector>,
    },
    DetectorSpec {
        field: instructor::FIELD,
        shape: Shape::Composite(SubfieldLayout::Inline, instructor::SUBFIELDS),
        build: boxed::<InstructorDetector>,
    },
    DetectorSpec {
        field: office::FIELD,
        shape: Shape::Composite(SubfieldLayout::Nested, office::SUBFIELDS),
        build: boxed::<OfficeDetector>,
    },
    DetectorSpec {
        field: phone::FIELD,
        shape: Shape::Flat,
        build: boxed::<PhoneDetector>,
    },
    DetectorSpec {
        field: response_time::FIELD,
        shape: Shape::Flat,
        build: boxed::<ResponseTimeDetector>,
    },
    DetectorSpec {
        field: modality::FIELD,
        shape: Shape::Flat,
        build: boxed::<ModalityDetector>,
    },
    DetectorSpec {
        field: class_location::FIELD,
        shape: Shape::Flat,
        build: boxed::<ClassLocationDetector>,
    },
    DetectorSpec {
        field: credit_hours::FIELD,
        shape: Shape::Flat,
        build: boxed::<CreditHoursDetector>,
    },
    DetectorSpec {
        field: workload::FIELD,
        shape: Shape::Flat,
        build: boxed::<WorkloadDetector>,
    },
    DetectorSpec {
        field: headings::ASSIGNMENT_TYPES,
        shape: Shape::Flat,
        build: build_assignment_types,
    },
    DetectorSpec {
        field: headings::GRADING_PROCEDURES,
        shape: Shape::Flat,
        build: build_grading_procedures,
    },
    DetectorSpec {
        field: late_work::FIELD,
        shape: Shape::Flat,
        build: build_late_work,
    },
    DetectorSpec {
        field: assignment_delivery::FIELD,
        shape: Shape::Flat,
        build: boxed::<AssignmentDeliveryDetector>,
    },
    DetectorSpec {
        field: final_grade_scale::FIELD,
        shape: Shape::Flat,
        build: boxed::<FinalGradeScaleDetector>,
    },
    DetectorSpec {
        field: preferred_contact::FIELD,
        shape: Shape::Flat,
        build: boxed::<PreferredContactDetector>,
    },
    DetectorSpec {
        field: grading_process::FIELD,
        shape: Shape::Flat,
        build: boxed::<GradingProcessDetector>,
    },
];

/// Look up a field spec by name.
pub fn spec_for(field: &str) -> Option<&'static DetectorSpec> {
    DETECTOR_SPECS.iter().find(|spec| spec.field == field)
}

/// Field names of every registered detector.
pub fn field_names() -> Vec<&'static str> {
    DETECTOR_SPECS.iter().map(|spec| spec.field).collect()
}

/// Result of analyzing one document.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Detection per field.
    pub fields: DetectionMap,
    /// Fields that were not found.
    pub missing: Vec<String>,
    /// Fields whose detector was unavailable.
    pub unavailable: Vec<String>,
    /// Non-fatal problems met while detecting.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// The constructed detector set.
pub struct DetectorRegistry {
    detectors: Vec<(&'static DetectorSpec, Box<dyn FieldDetector>)>,
    unavailable: Vec<(&'static DetectorSpec, DetectorError)>,
    max_document_chars: usize,
}

impl DetectorRegistry {
    /// Build every detector with default configuration.
    pub fn new() -> Self {
        Self::from_config(&DetectionConfig::default())
    }

    /// Build every detector, recording construction failures per field.
    pub fn from_config(config: &DetectionConfig) -> Self {
        for field in config.disabled.iter().chain(config.extra_headers.keys()) {
            if spec_for(field).is_none() {
                warn!("Unknown field '{}' in detection config", field);
            }
        }

        let mut detectors = Vec::new();
        let mut unavailable = Vec::new();

        for spec in DETECTOR_SPECS {
            let built = if config.is_disabled(spec.field) {
                Err(DetectorError::Unavailable {
                    field: spec.field.to_string(),
                    reason: "disabled by configuration".to_string(),
                })
            } else {
                (spec.build)(config)
            };

            match built {
                Ok(detector) => detectors.push((spec, detector)),
                Err(e) => {
                    warn!("{}", e);
                    unavailable.push((spec, e));
                }
            }
        }

        info!(
            "Detector registry ready: {} available, {} unavailable",
            detectors.len(),
            unavailable.len()
        );

        Self {
            detectors,
            unavailable,
            max_document_chars: config.max_document_chars,
        }
    }

    /// Field names with a working detector.
    pub fn available(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|(spec, _)| spec.field).collect()
    }

    /// Construction failures, one per unavailable field.
    pub fn unavailable(&self) -> Vec<&DetectorError> {
        self.unavailable.iter().map(|(_, e)| e).collect()
    }

    /// Run every detector over the same text.
    pub fn detect_all(&self, text: &str) -> DetectionMap {
        self.run(text).0
    }

    /// Run every detector and summarize the outcome.
    pub fn analyze(&self, text: &str) -> Analysis {
        let start = Instant::now();
        info!("Analyzing document of {} characters", text.chars().count());

        let (fields, failures) = self.run(text);

        let missing: Vec<String> = fields
            .iter()
            .filter(|(_, result)| !result.is_found())
            .map(|(name, _)| name.clone())
            .collect();
        let unavailable: Vec<String> =
            self.unavailable.iter().map(|(spec, _)| spec.field.to_string()).collect();
        let warnings: Vec<String> = failures.iter().map(|e| e.to_string()).collect();

        debug!(
            "Found {} of {} fields",
            fields.len() - missing.len(),
            fields.len()
        );

        Analysis {
            fields,
            missing,
            unavailable,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn run(&self, text: &str) -> (DetectionMap, Vec<DetectorError>) {
        let text = truncate_chars(text, self.max_document_chars);
        let mut results = DetectionMap::new();
        let mut failures = Vec::new();

        for (spec, detector) in &self.detectors {
            let result = match catch_unwind(AssertUnwindSafe(|| detector.detect(text))) {
                Ok(result) => result,
                Err(_) => {
                    let e = DetectorError::Panicked {
                        field: spec.field.to_string(),
                    };
                    warn!("{}", e);
                    failures.push(e);
                    spec.empty_result()
                }
            };

            if result.is_found() {
                debug!("{}: found ({:.2})", spec.field, result.confidence());
            }
            results.insert(spec.field.to_string(), result);
        }

        for (spec, _) in &self.unavailable {
            results.insert(spec.field.to_string(), spec.empty_result());
        }

        (results, failures)
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
