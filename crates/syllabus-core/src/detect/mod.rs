//! Syllabus field detection.
//!
//! Each field has an independent detector implementing [`FieldDetector`].
//! The [`registry`] builds the full detector set and runs it over a
//! document.

pub mod detectors;
pub mod normalize;
pub mod registry;
pub mod rules;
pub mod sections;

pub use normalize::{normalize, NormalizedText};
pub use registry::{Analysis, DetectorRegistry, DetectorSpec, DETECTOR_SPECS};

use tracing::trace;

use crate::models::detection::DetectionResult;

/// A detector for one syllabus field.
///
/// Detectors hold no per-document state. `detect` must degrade to a
/// not-found result on empty or malformed input rather than fail.
pub trait FieldDetector: Send + Sync {
    /// Stable field identifier.
    fn field_name(&self) -> &'static str;

    /// Detect the field in a full document.
    fn detect(&self, text: &str) -> DetectionResult;
}

/// A scored candidate value.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    /// Position as `start..end`, or `?` when unknown.
    pub fn location(&self) -> String {
        match self.position {
            Some((start, end)) => format!("{}..{}", start, end),
            None => "?".to_string(),
        }
    }
}

impl ExtractionMatch<String> {
    /// Value and confidence, the shape `FieldResult::from_option` takes.
    pub fn into_scored(self) -> (String, f32) {
        trace!(
            "matched '{}' at {} from '{}'",
            self.value,
            self.location(),
            self.source
        );
        (self.value, self.confidence)
    }
}
