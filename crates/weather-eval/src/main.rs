//! Evaluation binary for scoring weather text predictions

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather_eval::{run_evaluation, EvalConfig, FileSource};

/// Command-line arguments for evaluation
#[derive(Parser, Debug)]
#[command(name = "weather-eval")]
#[command(about = "Evaluate trilingual weather predictions")]
struct Args {
    /// Path to predictions CSV file
    #[arg(long, short = 'p')]
    predictions: PathBuf,

    /// Path to ground truth JSON file
    #[arg(long, short = 'g', alias = "ground_truth")]
    ground_truth: PathBuf,

    /// Path to save evaluation results (.md for a Markdown table, JSON otherwise)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Path to a JSON evaluation config
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Languages to evaluate, overriding the config (comma separated)
    #[arg(long, value_delimiter = ',')]
    languages: Option<Vec<String>>,

    /// Predictions file delimiter, overriding the config
    #[arg(long)]
    delimiter: Option<char>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EvalConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => EvalConfig::default(),
    }
    .with_overrides(args.languages.as_deref(), args.delimiter)
    .context("Invalid --languages or --delimiter")?;

    let source = FileSource::new(&args.predictions, &args.ground_truth)
        .with_delimiter(config.delimiter_byte()?);

    let report = run_evaluation(&source, &config.languages).context("Evaluation failed")?;

    report.print_summary();

    if let Some(output) = &args.output {
        report
            .save(output)
            .with_context(|| format!("Failed to save results to {:?}", output))?;
        println!("\nResults saved to {}", output.display());
    }

    Ok(())
}
