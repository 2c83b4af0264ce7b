//! Core library for syllabus field detection.
//!
//! This crate provides:
//! - Text normalization and a declarative pattern library
//! - Independent per-field detectors (learning outcomes, instructor contact,
//!   grading policy, modality, ...)
//! - An explicit detector registry that isolates per-field failures
//! - List/type normalization of structured extraction values
//! - Ground-truth evaluation with exact, loose, presence and structured
//!   comparison semantics

pub mod detect;
pub mod error;
pub mod eval;
pub mod models;
pub mod postprocess;
pub mod source;

pub use detect::{normalize, Analysis, DetectorRegistry, FieldDetector, NormalizedText};
pub use error::{DetectorError, EvaluationError, Result, SourceError, SyllabusError};
pub use eval::{AccuracyReport, EvaluationReport, Evaluator, Expectation, GroundTruthRecord};
pub use models::config::{DetectionConfig, EvaluationConfig, SyllabusConfig};
pub use models::detection::{DetectionMap, DetectionResult, FieldResult, SubfieldLayout};
pub use postprocess::{canonicalize, normalize_extraction, JoinPolicy};
pub use source::read_document;

/// Run every detector with default configuration.
pub fn detect_all(text: &str) -> DetectionMap {
    DetectorRegistry::new().detect_all(text)
}
