//! Normalize command - canonicalize structured extraction values to strings.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::Value;

use syllabus_core::normalize_extraction;

/// Arguments for the normalize command.
#[derive(Args)]
pub struct NormalizeArgs {
    /// Extraction JSON: an object of field values, or an array of such objects
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: NormalizeArgs) -> anyhow::Result<()> {
    let content = fs::read_to_string(&args.input)?;
    let extraction: Value = serde_json::from_str(&content)?;

    let normalized = match &extraction {
        Value::Object(_) => serde_json::to_value(normalize_extraction(&extraction))?,
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| serde_json::to_value(normalize_extraction(item)))
                .collect::<Result<_, _>>()?,
        ),
        _ => anyhow::bail!("Expected a JSON object or an array of objects"),
    };

    let output = serde_json::to_string_pretty(&normalized)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
