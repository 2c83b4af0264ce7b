//! Evaluate command - score detectors against a ground-truth corpus.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use syllabus_core::eval::{load_corpus, AccuracyReport, EvaluationReport, Evaluator, GroundTruthRecord};
use syllabus_core::source::{read_document, resolve_document};
use syllabus_core::DetectorRegistry;

use super::load_config;

/// Arguments for the evaluate command.
#[derive(Args)]
pub struct EvaluateArgs {
    /// Ground-truth corpus (JSON)
    #[arg(short, long, required = true)]
    ground_truth: PathBuf,

    /// Directory holding the corpus documents
    #[arg(short, long, required = true)]
    documents: PathBuf,

    /// Write the full JSON report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the per-field summary as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Number of parallel workers (default from config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Leave per-document details out of the report
    #[arg(long)]
    no_details: bool,
}

pub async fn run(args: EvaluateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.documents.is_dir() {
        anyhow::bail!("Documents directory not found: {}", args.documents.display());
    }

    let records = load_corpus(&args.ground_truth).map_err(|e| {
        anyhow::anyhow!("Failed to read ground truth {}: {}", args.ground_truth.display(), e)
    })?;

    println!(
        "{} Found {} records in ground truth",
        style("ℹ").blue(),
        records.len()
    );

    let jobs = args.jobs.unwrap_or(config.evaluation.jobs).max(1);
    let include_details = config.evaluation.include_details && !args.no_details;
    let registry = Arc::new(DetectorRegistry::from_config(&config.detection));
    let evaluator = Evaluator::new(&config.evaluation);
    let documents = Arc::new(args.documents.clone());

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")?
            .progress_chars("=>-"),
    );

    let chunk_size = records.len().div_ceil(jobs).max(1);
    info!("Evaluating {} documents on {} workers", records.len(), jobs);

    // Each worker returns its own partial report.
    let mut handles = Vec::new();
    for chunk in records.chunks(chunk_size) {
        let chunk = chunk.to_vec();
        let registry = Arc::clone(&registry);
        let evaluator = evaluator.clone();
        let documents = Arc::clone(&documents);
        let pb = pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let mut report = AccuracyReport::new();
            for record in &chunk {
                report = report.merge(evaluate_record(&registry, &evaluator, &documents, record));
                pb.inc(1);
            }
            report
        }));
    }

    let mut combined = AccuracyReport::new();
    for handle in handles {
        combined = combined.merge(handle.await?);
    }
    pb.finish_and_clear();

    let scored = combined.documents_scored();
    let report = combined.into_report(include_details);

    print_summary(&report);

    if !report.skipped.is_empty() {
        println!();
        println!("{}", style("Skipped documents:").yellow());
        for skipped in &report.skipped {
            println!("  - {}: {}", skipped.document_id, skipped.reason);
        }
    }

    if let Some(output_path) = &args.output {
        fs::write(output_path, serde_json::to_string_pretty(&report)?)?;
        println!(
            "{} Results saved to {}",
            style("✓").green(),
            output_path.display()
        );
    }

    if let Some(csv_path) = &args.csv {
        write_summary_csv(csv_path, &report)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            csv_path.display()
        );
    }

    debug!("Scored {} documents in {:?}", scored, start.elapsed());

    Ok(())
}

fn evaluate_record(
    registry: &DetectorRegistry,
    evaluator: &Evaluator,
    documents: &Path,
    record: &GroundTruthRecord,
) -> AccuracyReport {
    let mut report = AccuracyReport::new();

    let Some(path) = resolve_document(documents, &record.document_id) else {
        warn!("Missing file: {}", record.document_id);
        report.skip(record.document_id.clone(), "document not found");
        return report;
    };

    match read_document(&path) {
        Ok(text) => evaluator.evaluate_text(registry, record, &text),
        Err(e) => {
            warn!("Error reading {}: {}", path.display(), e);
            report.skip(record.document_id.clone(), e.to_string());
            report
        }
    }
}

fn print_summary(report: &EvaluationReport) {
    println!();
    println!("{}", "=".repeat(70));
    println!("{}", style("RESULTS SUMMARY").bold());
    println!("{}", "=".repeat(70));
    println!("{:<34} {:<10} Correct/Total", "Field", "Accuracy");
    println!("{}", "-".repeat(70));

    for (field, summary) in &report.summary {
        println!(
            "{:<34} {:>6.1}%    {:>3}/{:<3}",
            field,
            summary.accuracy * 100.0,
            summary.correct,
            summary.total
        );
    }

    println!("{}", "-".repeat(70));
    println!(
        "{:<34} {:>6.1}%    {}/{}",
        "OVERALL",
        report.overall.accuracy * 100.0,
        report.overall.correct,
        report.overall.total
    );
    println!("{}", "=".repeat(70));
}

fn write_summary_csv(path: &Path, report: &EvaluationReport) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["field", "correct", "total", "accuracy"])?;
    for (field, summary) in &report.summary {
        wtr.write_record([
            field.as_str(),
            &summary.correct.to_string(),
            &summary.total.to_string(),
            &format!("{:.4}", summary.accuracy),
        ])?;
    }
    wtr.write_record([
        "overall",
        &report.overall.correct.to_string(),
        &report.overall.total.to_string(),
        &format!("{:.4}", report.overall.accuracy),
    ])?;

    wtr.flush()?;
    Ok(())
}
