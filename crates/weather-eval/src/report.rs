//! Report generation for evaluation results

use crate::config::{Language, OVERALL_KEY};
use crate::error::{EvalError, Result};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Scores for a single language
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LanguageResult {
    /// Exact-match accuracy in [0, 1]
    pub accuracy: f64,
    /// Perplexity; infinite when no log-probabilities were available
    #[serde(with = "perplexity_value")]
    pub perplexity: f64,
    /// Number of predicted texts for the language
    pub num_samples: usize,
}

/// Unweighted means across all evaluated languages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallResult {
    pub accuracy: f64,
    #[serde(with = "perplexity_value")]
    pub perplexity: f64,
}

/// Per-language results plus the `overall` summary
///
/// Serializes as a single JSON object: one key per language in evaluation
/// order, followed by `overall`.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub languages: Vec<(Language, LanguageResult)>,
    pub overall: OverallResult,
}

impl EvaluationReport {
    /// Generate a report from per-language results
    ///
    /// Means are plain averages; a single infinite perplexity makes the
    /// overall perplexity infinite.
    pub fn generate_report(results: Vec<(Language, LanguageResult)>) -> Self {
        let count = results.len() as f64;
        let (accuracy_sum, perplexity_sum) = results
            .iter()
            .fold((0.0, 0.0), |(acc, ppl), (_, r)| (acc + r.accuracy, ppl + r.perplexity));

        let overall = if results.is_empty() {
            OverallResult {
                accuracy: 0.0,
                perplexity: f64::INFINITY,
            }
        } else {
            OverallResult {
                accuracy: accuracy_sum / count,
                perplexity: perplexity_sum / count,
            }
        };

        Self {
            languages: results,
            overall,
        }
    }

    /// Result for a language, by identifier
    pub fn get(&self, language: &str) -> Option<&LanguageResult> {
        self.languages
            .iter()
            .find(|(name, _)| name.as_str() == language)
            .map(|(_, result)| result)
    }

    /// Print per-language and overall scores to stdout
    pub fn print_summary(&self) {
        for (language, result) in &self.languages {
            println!("{} Results:", language.display_name());
            println!("  Accuracy: {:.4}", result.accuracy);
            println!("  Perplexity: {:.4}", result.perplexity);
            println!("  Samples: {}", result.num_samples);
            println!();
        }

        println!("Overall Results:");
        println!("  Average Accuracy: {:.4}", self.overall.accuracy);
        println!("  Average Perplexity: {:.4}", self.overall.perplexity);
    }

    /// Indented JSON form of the report
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format report as markdown
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("# Evaluation Report\n\n");
        md.push_str(&format!(
            "**Average Accuracy**: {:.2}%\n\n",
            self.overall.accuracy * 100.0
        ));
        md.push_str(&format!(
            "**Average Perplexity**: {:.4}\n\n",
            self.overall.perplexity
        ));
        md.push_str("## Language Results\n\n");
        md.push_str("| Language | Samples | Accuracy | Perplexity |\n");
        md.push_str("|----------|---------|----------|------------|\n");

        for (name, result) in &self.languages {
            md.push_str(&format!(
                "| {} | {} | {:.2}% | {:.4} |\n",
                name,
                result.num_samples,
                result.accuracy * 100.0,
                result.perplexity
            ));
        }

        md
    }

    /// Write the report to `path`
    ///
    /// A `.md` path gets the Markdown table; anything else gets indented JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if path.extension().is_some_and(|ext| ext == "md") {
            self.to_markdown()
        } else {
            self.to_json()?
        };
        std::fs::write(path, content).map_err(|e| EvalError::from_io(path, e))?;
        debug!(path = ?path, "results saved");
        Ok(())
    }
}

impl Serialize for EvaluationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.languages.len() + 1))?;
        for (name, result) in &self.languages {
            map.serialize_entry(name.as_str(), result)?;
        }
        map.serialize_entry(OVERALL_KEY, &self.overall)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for EvaluationReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ReportVisitor;

        impl<'de> Visitor<'de> for ReportVisitor {
            type Value = EvaluationReport;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of language results with an `overall` entry")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<EvaluationReport, A::Error> {
                let mut languages = Vec::new();
                let mut overall = None;
                while let Some(key) = access.next_key::<String>()? {
                    if key == OVERALL_KEY {
                        if overall.is_some() {
                            return Err(de::Error::duplicate_field(OVERALL_KEY));
                        }
                        overall = Some(access.next_value()?);
                    } else {
                        let language = Language::new(key).map_err(de::Error::custom)?;
                        languages.push((language, access.next_value()?));
                    }
                }
                let overall = overall.ok_or_else(|| de::Error::missing_field(OVERALL_KEY))?;
                Ok(EvaluationReport { languages, overall })
            }
        }

        deserializer.deserialize_map(ReportVisitor)
    }
}

/// JSON has no infinity literal, so non-finite perplexities travel as strings
mod perplexity_value {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "Infinity" } else { "-Infinity" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "Infinity" | "inf" => Ok(f64::INFINITY),
                "-Infinity" | "-inf" => Ok(f64::NEG_INFINITY),
                "NaN" | "nan" => Ok(f64::NAN),
                other => Err(serde::de::Error::custom(format!(
                    "invalid perplexity: {:?}",
                    other
                ))),
            },
        }
    }
}
