//! CLI application for syllabus field detection and detector evaluation.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, detect, detect_batch, evaluate, normalize, patterns};

/// Syllabus field detection - find required fields in course syllabi
#[derive(Parser)]
#[command(name = "syllabus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect fields in a single document
    Detect(detect::DetectArgs),

    /// Detect fields in multiple documents
    DetectBatch(detect_batch::DetectBatchArgs),

    /// Score detectors against a ground-truth corpus
    Evaluate(evaluate::EvaluateArgs),

    /// Canonicalize a structured extraction to strings
    Normalize(normalize::NormalizeArgs),

    /// List the detector pattern library
    Patterns(patterns::PatternsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr so JSON on stdout stays clean.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Detect(args) => detect::run(args, cli.config.as_deref()).await,
        Commands::DetectBatch(args) => detect_batch::run(args, cli.config.as_deref()).await,
        Commands::Evaluate(args) => evaluate::run(args, cli.config.as_deref()).await,
        Commands::Normalize(args) => normalize::run(args).await,
        Commands::Patterns(args) => patterns::run(args).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
