//! Evaluation of multilingual weather text predictions
//!
//! This crate scores model predictions against a ground truth dataset:
//! - exact-match accuracy of predicted text, per language
//! - perplexity from the model's log-probabilities, per language
//! - unweighted averages of both across the language set

pub mod config;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod metrics;
pub mod report;

pub use config::{EvalConfig, Language, LanguageSet};
pub use error::{EvalError, Result};
pub use evaluator::evaluate_language;
pub use loader::{FileSource, GroundTruthRecord, InMemorySource, PredictionRecord, RecordSource};
pub use report::{EvaluationReport, LanguageResult, OverallResult};

use tracing::info;

/// Evaluate every language in `languages` over already loaded records
///
/// Languages are scored in set order; the first error aborts the run.
pub fn evaluate_all(
    predictions: &[PredictionRecord],
    ground_truth: &[GroundTruthRecord],
    languages: &LanguageSet,
) -> Result<EvaluationReport> {
    let mut results = Vec::with_capacity(languages.len());
    for language in languages {
        info!("Evaluating {}...", language);
        let result = evaluate_language(predictions, ground_truth, language)?;
        results.push((language.clone(), result));
    }
    Ok(EvaluationReport::generate_report(results))
}

/// Load both record collections from `source` and evaluate them
pub fn run_evaluation<S: RecordSource + ?Sized>(
    source: &S,
    languages: &LanguageSet,
) -> Result<EvaluationReport> {
    info!("Loading predictions...");
    let predictions = source.predictions()?;

    info!("Loading ground truth...");
    let ground_truth = source.ground_truth()?;

    evaluate_all(&predictions, &ground_truth, languages)
}
