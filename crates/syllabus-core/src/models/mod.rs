//! Data models shared across the crate.

pub mod config;
pub mod detection;

pub use config::{DetectionConfig, EvaluationConfig, SyllabusConfig};
pub use detection::{CompositeResult, DetectionMap, DetectionResult, FieldResult, SubfieldLayout};
