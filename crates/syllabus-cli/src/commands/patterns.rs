//! Patterns command - list the detector pattern library.

use clap::Args;
use console::style;
use serde::Serialize;

use syllabus_core::detect::rules::{library, patterns_for, FieldPatterns, SECTION_BOUNDARIES};

/// Arguments for the patterns command.
#[derive(Args)]
pub struct PatternsArgs {
    /// Only show patterns for this field
    #[arg(long)]
    field: Option<String>,

    /// Print as JSON
    #[arg(long)]
    json: bool,

    /// Also list the section boundary titles
    #[arg(long)]
    boundaries: bool,
}

#[derive(Serialize)]
struct RuleView<'a> {
    name: &'a str,
    pattern: &'a str,
    weight: f32,
}

#[derive(Serialize)]
struct FieldView<'a> {
    field: &'a str,
    headers: &'a [&'static str],
    rules: Vec<RuleView<'a>>,
    exclusions: Vec<&'a str>,
}

impl<'a> From<&'a FieldPatterns> for FieldView<'a> {
    fn from(patterns: &'a FieldPatterns) -> Self {
        Self {
            field: patterns.field,
            headers: &patterns.headers,
            rules: patterns
                .rules
                .iter()
                .map(|rule| RuleView {
                    name: rule.name,
                    pattern: rule.pattern.as_str(),
                    weight: rule.weight,
                })
                .collect(),
            exclusions: patterns.exclusions.iter().map(|re| re.as_str()).collect(),
        }
    }
}

pub async fn run(args: PatternsArgs) -> anyhow::Result<()> {
    let selected = match &args.field {
        Some(field) => {
            let found = patterns_for(field);
            if found.is_empty() {
                let known: Vec<&str> = library().iter().map(|p| p.field).collect();
                anyhow::bail!("No patterns for field '{}'. Known fields: {}", field, known.join(", "));
            }
            found
        }
        None => library(),
    };

    let views: Vec<FieldView> = selected.into_iter().map(FieldView::from).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    for view in &views {
        println!("{}", style(view.field).bold());
        if !view.headers.is_empty() {
            println!("  headers:");
            for header in view.headers {
                println!("    - {}", header);
            }
        }
        if !view.rules.is_empty() {
            println!("  rules:");
            for rule in &view.rules {
                println!("    - {} ({:.2}): {}", rule.name, rule.weight, rule.pattern);
            }
        }
        if !view.exclusions.is_empty() {
            println!("  exclusions:");
            for exclusion in &view.exclusions {
                println!("    - {}", exclusion);
            }
        }
        println!();
    }

    if args.boundaries {
        println!("{}", style("section boundaries").bold());
        for title in SECTION_BOUNDARIES {
            println!("    - {}", title);
        }
    }

    Ok(())
}
