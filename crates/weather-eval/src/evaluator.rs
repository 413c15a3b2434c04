//! Per-language scoring over loaded records

use crate::config::Language;
use crate::error::{EvalError, Result};
use crate::loader::{GroundTruthRecord, PredictionRecord};
use crate::metrics;
use crate::report::LanguageResult;
use serde_json::Value;
use tracing::{debug, warn};

/// Evaluate predictions for a specific language
///
/// Records lacking the language's fields are skipped. Predictions and ground
/// truth are aligned by position after skipping, so a field present in only
/// some records shifts the alignment; that case is logged but not corrected.
///
/// # Arguments
/// * `predictions` - Prediction rows
/// * `ground_truth` - Reference records, in the same sample order
/// * `language` - Language whose `_text` / `_logprob` fields are scored
///
/// # Returns
/// Accuracy, perplexity and sample count. Accuracy is 0.0 when either side
/// has no texts; perplexity is infinite when there are no log-probabilities.
pub fn evaluate_language(
    predictions: &[PredictionRecord],
    ground_truth: &[GroundTruthRecord],
    language: &Language,
) -> Result<LanguageResult> {
    let text_field = language.text_field();
    let logprob_field = language.logprob_field();

    let pred_texts: Vec<&str> = predictions
        .iter()
        .filter_map(|record| record.get(&text_field))
        .collect();

    let pred_log_probs = predictions
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            record
                .get(&logprob_field)
                .map(|raw| parse_log_prob(raw, language, &logprob_field, index))
        })
        .collect::<Result<Vec<f64>>>()?;

    let gt_texts = ground_truth
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            record
                .get(&text_field)
                .map(|value| reference_text(value, language, &text_field, index))
        })
        .collect::<Result<Vec<&str>>>()?;

    warn_on_partial_field(language, &text_field, "predictions", pred_texts.len(), predictions.len());
    warn_on_partial_field(language, &text_field, "ground truth", gt_texts.len(), ground_truth.len());
    debug!(
        language = %language,
        predicted = pred_texts.len(),
        reference = gt_texts.len(),
        log_probs = pred_log_probs.len(),
        "extracted fields"
    );

    let accuracy = if !pred_texts.is_empty() && !gt_texts.is_empty() {
        metrics::accuracy(&pred_texts, &gt_texts).map_err(|e| EvalError::LengthMismatch {
            language: language.to_string(),
            predicted: e.predicted,
            reference: e.reference,
        })?
    } else {
        0.0
    };

    Ok(LanguageResult {
        accuracy,
        perplexity: metrics::perplexity(&pred_log_probs),
        num_samples: pred_texts.len(),
    })
}

fn parse_log_prob(raw: &str, language: &Language, field: &str, index: usize) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| EvalError::InvalidField {
            language: language.to_string(),
            field: field.to_string(),
            index,
            reason: format!("{:?} is not a number: {}", raw, e),
        })
}

fn reference_text<'a>(
    value: &'a Value,
    language: &Language,
    field: &str,
    index: usize,
) -> Result<&'a str> {
    value.as_str().ok_or_else(|| EvalError::InvalidField {
        language: language.to_string(),
        field: field.to_string(),
        index,
        reason: format!("expected a string, got {}", value),
    })
}

fn warn_on_partial_field(language: &Language, field: &str, side: &str, found: usize, total: usize) {
    if found > 0 && found < total {
        warn!(
            language = %language,
            field,
            side,
            skipped = total - found,
            "records missing field were skipped; positional alignment may be off"
        );
    }
}
