//! Detect command - find syllabus fields in a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use syllabus_core::source::read_document;
use syllabus_core::DetectorRegistry;

use super::{format_detections, load_config, missing_fields, OutputFormat};

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// Input document (.txt, .md or .pdf)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// List the fields that were not found
    #[arg(long)]
    missing: bool,
}

pub async fn run(args: DetectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Detecting fields in {}", args.input.display());
    let text = read_document(&args.input)?;

    let registry = DetectorRegistry::from_config(&config.detection);
    let analysis = registry.analyze(&text);

    let output = format_detections(&analysis.fields, args.format)?;

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

    for warning in &analysis.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    if args.missing {
        let missing = missing_fields(&analysis.fields);
        eprintln!();
        if missing.is_empty() {
            eprintln!("{} All {} fields found", style("✓").green(), analysis.fields.len());
        } else {
            eprintln!(
                "{} Missing {} of {} fields:",
                style("ℹ").blue(),
                missing.len(),
                analysis.fields.len()
            );
            for field in missing {
                eprintln!("  - {}", field);
            }
        }
    }

    debug!(
        "Detection took {}ms, total {:?}",
        analysis.processing_time_ms,
        start.elapsed()
    );

    Ok(())
}
