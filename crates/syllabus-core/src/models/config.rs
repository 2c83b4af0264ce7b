//! Configuration structures for detection and evaluation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::SyllabusError;

/// Main configuration for the syllabus pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyllabusConfig {
    /// Detector registry configuration.
    pub detection: DetectionConfig,

    /// Ground-truth evaluation configuration.
    pub evaluation: EvaluationConfig,
}

/// Detector registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Field names whose detectors should not be constructed.
    pub disabled: Vec<String>,

    /// Documents are truncated to this many characters before detection.
    pub max_document_chars: usize,

    /// Additional section titles for header-driven detectors, keyed by field name.
    pub extra_headers: BTreeMap<String, Vec<String>>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            max_document_chars: 60_000,
            extra_headers: BTreeMap::new(),
        }
    }
}

impl DetectionConfig {
    /// Extra headers configured for a field.
    pub fn headers_for(&self, field: &str) -> &[String] {
        self.extra_headers
            .get(field)
            .map(|h| h.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_disabled(&self, field: &str) -> bool {
        self.disabled.iter().any(|f| f == field)
    }
}

/// Ground-truth evaluation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Similarity threshold (0.0 - 1.0) for loose string matches.
    pub loose_threshold: f64,

    /// Number of parallel workers.
    pub jobs: usize,

    /// Include per-document comparison details in reports.
    pub include_details: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            loose_threshold: 0.80,
            jobs: 4,
            include_details: true,
        }
    }
}

impl SyllabusConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Check value ranges.
    pub fn validate(&self) -> crate::Result<()> {
        let threshold = self.evaluation.loose_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SyllabusError::Config(format!(
                "evaluation.loose_threshold must be between 0 and 1, got {}",
                threshold
            )));
        }
        if self.evaluation.jobs == 0 {
            return Err(SyllabusError::Config("evaluation.jobs must be at least 1".to_string()));
        }
        if self.detection.max_document_chars == 0 {
            return Err(SyllabusError::Config(
                "detection.max_document_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
