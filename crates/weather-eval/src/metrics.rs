//! Perplexity and exact-match accuracy

use thiserror::Error;

/// Predicted and reference sequences differ in length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Predictions and ground truth must have same length ({predicted} vs {reference})")]
pub struct LengthMismatch {
    pub predicted: usize,
    pub reference: usize,
}

/// Perplexity from per-sample log-probabilities
///
/// PPL = exp(-mean(log_probs)). An empty slice has no probability data and
/// yields `f64::INFINITY`. Overflow to infinity for very negative means is
/// kept as is.
pub fn perplexity(log_probs: &[f64]) -> f64 {
    if log_probs.is_empty() {
        return f64::INFINITY;
    }

    let mean = log_probs.iter().sum::<f64>() / log_probs.len() as f64;
    (-mean).exp()
}

/// Normalized form used for exact-match comparison: trimmed and lowercased
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Exact-match accuracy between aligned predicted and reference texts
///
/// # Arguments
/// * `predicted` - Model outputs
/// * `reference` - Reference texts, aligned by position
///
/// # Returns
/// Fraction of positions whose normalized texts are equal. Callers handle
/// the empty case; an empty pair here returns 0.0.
pub fn accuracy<P, R>(predicted: &[P], reference: &[R]) -> Result<f64, LengthMismatch>
where
    P: AsRef<str>,
    R: AsRef<str>,
{
    if predicted.len() != reference.len() {
        return Err(LengthMismatch {
            predicted: predicted.len(),
            reference: reference.len(),
        });
    }
    if predicted.is_empty() {
        return Ok(0.0);
    }

    let correct = predicted
        .iter()
        .zip(reference)
        .filter(|&(pred, truth)| normalize(pred.as_ref()) == normalize(truth.as_ref()))
        .count();

    Ok(correct as f64 / predicted.len() as f64)
}
