//! Error types for the syllabus-core library.
//!
//! A field that is simply absent from a document is never an error; it is
//! reported as `found = false`. The enums here cover the failures that the
//! registry, the evaluation harness and the document sources can hit.

use thiserror::Error;

/// Main error type for the syllabus library.
#[derive(Error, Debug)]
pub enum SyllabusError {
    /// Detector construction or invocation error.
    #[error("detector error: {0}")]
    Detector(#[from] DetectorError),

    /// Ground-truth evaluation error.
    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    /// Document text extraction error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors isolated to a single field detector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectorError {
    /// The detector could not be constructed.
    #[error("detector for '{field}' is unavailable: {reason}")]
    Unavailable { field: String, reason: String },

    /// The detector panicked while scanning a document.
    #[error("detector for '{field}' panicked")]
    Panicked { field: String },
}

/// Errors raised while scoring detections against ground truth.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// The expected value and the detected value have incompatible shapes.
    #[error("comparison type mismatch for '{field}': expected {expected}, predicted {predicted}")]
    ComparisonTypeMismatch {
        field: String,
        expected: String,
        predicted: String,
    },

    /// The ground-truth corpus could not be interpreted.
    #[error("invalid ground-truth corpus: {0}")]
    Corpus(String),
}

/// Errors related to reading document text.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The file extension is not a supported document type.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Failed to extract text from a PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The document produced no text at all.
    #[error("document contains no text")]
    Empty,
}

/// Result type for the syllabus library.
pub type Result<T> = std::result::Result<T, SyllabusError>;
