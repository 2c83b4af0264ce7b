//! Pattern data for field detectors.

pub mod library;
pub mod patterns;

pub use library::{
    header_key, is_section_boundary, library, patterns_for, FieldPatterns, PatternRule, RuleMatch,
    SECTION_BOUNDARIES,
};
