//! Unit tests for per-language evaluation

use serde_json::json;
use weather_eval::{
    evaluate_all, evaluate_language, EvalError, GroundTruthRecord, Language, LanguageSet,
    PredictionRecord,
};

fn prediction(fields: &[(&str, &str)]) -> PredictionRecord {
    fields.iter().copied().collect()
}

fn truth(fields: &[(&str, &str)]) -> GroundTruthRecord {
    fields.iter().copied().collect()
}

fn english() -> Language {
    Language::new("english").expect("valid identifier")
}

#[test]
fn test_single_matching_sample() {
    let predictions = vec![prediction(&[("english_text", "Sunny"), ("english_logprob", "-0.5")])];
    let ground_truth = vec![truth(&[("english_text", "sunny")])];

    let result = evaluate_language(&predictions, &ground_truth, &english()).expect("evaluation");

    assert_eq!(result.accuracy, 1.0);
    assert!((result.perplexity - 0.5_f64.exp()).abs() < 1e-12);
    assert_eq!(result.num_samples, 1);
}

#[test]
fn test_language_without_fields() {
    let predictions = vec![prediction(&[("english_text", "Sunny"), ("english_logprob", "-0.5")])];
    let ground_truth = vec![truth(&[("english_text", "sunny")])];
    let german = Language::new("german").unwrap();

    let result = evaluate_language(&predictions, &ground_truth, &german).expect("evaluation");

    assert_eq!(result.accuracy, 0.0);
    assert!(result.perplexity.is_infinite());
    assert_eq!(result.num_samples, 0);
}

#[test]
fn test_predictions_without_ground_truth_score_zero() {
    let predictions = vec![
        prediction(&[("english_text", "Sunny")]),
        prediction(&[("english_text", "Cloudy")]),
    ];

    let result = evaluate_language(&predictions, &[], &english()).expect("evaluation");

    assert_eq!(result.accuracy, 0.0);
    assert_eq!(result.num_samples, 2);
    assert!(result.perplexity.is_infinite());
}

#[test]
fn test_length_mismatch_names_language() {
    let predictions = vec![prediction(&[("english_text", "A")])];
    let ground_truth = vec![truth(&[("english_text", "A")]), truth(&[("english_text", "B")])];

    let err = evaluate_language(&predictions, &ground_truth, &english()).unwrap_err();

    match err {
        EvalError::LengthMismatch {
            language,
            predicted,
            reference,
        } => {
            assert_eq!(language, "english");
            assert_eq!(predicted, 1);
            assert_eq!(reference, 2);
        }
        other => panic!("expected LengthMismatch, got {:?}", other),
    }
}

#[test]
fn test_records_missing_field_are_skipped() {
    // The second ground truth record has no english text, so only the first
    // and third are aligned with the two predictions.
    let predictions = vec![
        prediction(&[("english_text", "Sunny")]),
        prediction(&[("english_text", "Rain")]),
    ];
    let ground_truth = vec![
        truth(&[("english_text", "sunny")]),
        truth(&[("french_text", "pluie")]),
        truth(&[("english_text", "rain")]),
    ];

    let result = evaluate_language(&predictions, &ground_truth, &english()).expect("evaluation");

    assert_eq!(result.accuracy, 1.0);
    assert_eq!(result.num_samples, 2);
}

#[test]
fn test_invalid_logprob_is_an_error() {
    let predictions = vec![
        prediction(&[("english_text", "Sunny"), ("english_logprob", "-0.5")]),
        prediction(&[("english_text", "Rain"), ("english_logprob", "unlikely")]),
    ];
    let ground_truth = vec![truth(&[("english_text", "sunny")]), truth(&[("english_text", "rain")])];

    let err = evaluate_language(&predictions, &ground_truth, &english()).unwrap_err();

    assert!(matches!(
        err,
        EvalError::InvalidField { ref field, index: 1, .. } if field == "english_logprob"
    ));
}

#[test]
fn test_non_string_reference_text_is_an_error() {
    let predictions = vec![prediction(&[("english_text", "42")])];
    let ground_truth = vec![[("english_text", json!(42))].into_iter().collect::<GroundTruthRecord>()];

    let err = evaluate_language(&predictions, &ground_truth, &english()).unwrap_err();

    assert!(matches!(err, EvalError::InvalidField { index: 0, .. }));
}

#[test]
fn test_evaluate_all_hand_computed_means() {
    let predictions = vec![
        prediction(&[
            ("english_text", "Sunny"),
            ("english_logprob", "0.0"),
            ("french_text", "Pluie"),
            ("french_logprob", "-1.0"),
            ("german_text", "Schnee"),
            ("german_logprob", "-2.0"),
        ]),
        prediction(&[
            ("english_text", "Windy"),
            ("english_logprob", "0.0"),
            ("french_text", "Neige"),
            ("french_logprob", "-1.0"),
            ("german_text", "Nebel"),
            ("german_logprob", "-2.0"),
        ]),
    ];
    let ground_truth = vec![
        truth(&[("english_text", "sunny"), ("french_text", "pluie"), ("german_text", "regen")]),
        truth(&[("english_text", "windy"), ("french_text", "vent"), ("german_text", "sonne")]),
    ];

    let report = evaluate_all(&predictions, &ground_truth, &LanguageSet::default())
        .expect("evaluation");

    // english 1.0, french 0.5, german 0.0
    assert_eq!(report.get("english").unwrap().accuracy, 1.0);
    assert_eq!(report.get("french").unwrap().accuracy, 0.5);
    assert_eq!(report.get("german").unwrap().accuracy, 0.0);
    assert!((report.overall.accuracy - 0.5).abs() < 1e-12);

    let expected_ppl = (1.0 + 1.0_f64.exp() + 2.0_f64.exp()) / 3.0;
    assert!((report.overall.perplexity - expected_ppl).abs() < 1e-9);
}

#[test]
fn test_evaluate_all_stops_at_first_failing_language() {
    let predictions = vec![prediction(&[("french_text", "Pluie")])];
    let ground_truth = vec![
        truth(&[("french_text", "pluie")]),
        truth(&[("french_text", "neige")]),
    ];

    let err = evaluate_all(&predictions, &ground_truth, &LanguageSet::default()).unwrap_err();
    assert!(matches!(err, EvalError::LengthMismatch { ref language, .. } if language == "french"));
}
