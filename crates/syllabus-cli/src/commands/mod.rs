//! CLI subcommands and shared helpers.

pub mod config;
pub mod detect;
pub mod detect_batch;
pub mod evaluate;
pub mod normalize;
pub mod patterns;

use std::path::{Path, PathBuf};

use syllabus_core::models::detection::DetectionMap;
use syllabus_core::SyllabusConfig;
use tracing::debug;

/// Output format for detection results.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per field
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("syllabus")
        .join("config.json")
}

/// Load the `-c` config file, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SyllabusConfig> {
    let config = match config_path {
        Some(path) => SyllabusConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e))?,
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                debug!("Using config file {}", default_path.display());
                SyllabusConfig::from_file(&default_path)?
            } else {
                SyllabusConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

pub fn format_detections(results: &DetectionMap, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        OutputFormat::Csv => format_csv(results),
        OutputFormat::Text => Ok(format_text(results)),
    }
}

fn format_csv(results: &DetectionMap) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["field_name", "found", "content"])?;
    for (field, result) in results {
        wtr.write_record([
            field.as_str(),
            if result.is_found() { "true" } else { "false" },
            &result.content(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(results: &DetectionMap) -> String {
    let mut output = String::new();

    for (field, result) in results {
        if result.is_found() {
            output.push_str(&format!("{}:\n", field));
            for line in result.content().lines() {
                output.push_str(&format!("  {}\n", line));
            }
        } else {
            output.push_str(&format!("{}: (not found)\n", field));
        }
    }

    output
}

/// Fields that were not found, in report order.
pub fn missing_fields(results: &DetectionMap) -> Vec<&str> {
    results
        .iter()
        .filter(|(_, result)| !result.is_found())
        .map(|(field, _)| field.as_str())
        .collect()
}
