//! Evaluation configuration
//!
//! The scored languages and the column naming convention (`<language>_text`,
//! `<language>_logprob`) live here rather than in the evaluator, so the language
//! set can grow without touching metric code. A configuration can be loaded
//! from a JSON file; every key is optional.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Languages scored when no configuration overrides them, in report order
pub const DEFAULT_LANGUAGES: [&str; 3] = ["english", "french", "german"];

/// Report key holding the cross-language averages; not usable as a language
pub const OVERALL_KEY: &str = "overall";

/// A language identifier used as the prefix of record field names
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    /// Create a language identifier
    ///
    /// Identifiers must be non-empty and contain no whitespace, since they
    /// are embedded in column names.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(EvalError::Config("language identifier is empty".to_string()));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(EvalError::Config(format!(
                "language identifier contains whitespace: {:?}",
                id
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Field holding predicted or reference text, e.g. `english_text`
    pub fn text_field(&self) -> String {
        format!("{}_text", self.0)
    }

    /// Field holding the model's log-probability, e.g. `english_logprob`
    pub fn logprob_field(&self) -> String {
        format!("{}_logprob", self.0)
    }

    /// Identifier with its first letter capitalised, for console output
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = EvalError;

    fn try_from(id: String) -> Result<Self> {
        Language::new(id)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, non-empty set of languages to evaluate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Language>", into = "Vec<Language>")]
pub struct LanguageSet(Vec<Language>);

impl LanguageSet {
    /// Build a set from identifiers, rejecting an empty list, duplicates and `overall`
    pub fn parse<S: AsRef<str>>(ids: &[S]) -> Result<Self> {
        let languages = ids
            .iter()
            .map(|id| Language::new(id.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::try_from(languages)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Language> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for LanguageSet {
    fn default() -> Self {
        Self(
            DEFAULT_LANGUAGES
                .iter()
                .map(|id| Language(id.to_string()))
                .collect(),
        )
    }
}

impl TryFrom<Vec<Language>> for LanguageSet {
    type Error = EvalError;

    fn try_from(languages: Vec<Language>) -> Result<Self> {
        if languages.is_empty() {
            return Err(EvalError::Config("language set is empty".to_string()));
        }
        for (i, language) in languages.iter().enumerate() {
            if language.as_str() == OVERALL_KEY {
                return Err(EvalError::Config(format!(
                    "'{}' is reserved for the averaged results",
                    OVERALL_KEY
                )));
            }
            if languages[..i].contains(language) {
                return Err(EvalError::Config(format!(
                    "duplicate language: {}",
                    language
                )));
            }
        }
        Ok(Self(languages))
    }
}

impl From<LanguageSet> for Vec<Language> {
    fn from(set: LanguageSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a LanguageSet {
    type Item = &'a Language;
    type IntoIter = std::slice::Iter<'a, Language>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn default_delimiter() -> char {
    ','
}

/// Evaluation settings, loadable from a JSON file
///
/// ```json
/// { "languages": ["english", "french", "german"], "delimiter": "," }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Languages to score, in report order
    #[serde(default)]
    pub languages: LanguageSet,
    /// Field delimiter of the predictions file
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            languages: LanguageSet::default(),
            delimiter: default_delimiter(),
        }
    }
}

impl EvalConfig {
    /// Load configuration from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON configuration file
    ///
    /// # Returns
    /// Validated configuration, or an error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::from_io(path, e))?;
        let config: EvalConfig = serde_json::from_str(&content)
            .map_err(|e| EvalError::Config(format!("{:?}: {}", path, e)))?;
        config.delimiter_byte()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of this configuration
    pub fn with_overrides<S: AsRef<str>>(
        mut self,
        languages: Option<&[S]>,
        delimiter: Option<char>,
    ) -> Result<Self> {
        if let Some(languages) = languages {
            self.languages = LanguageSet::parse(languages)?;
        }
        if let Some(delimiter) = delimiter {
            self.delimiter = delimiter;
        }
        self.delimiter_byte()?;
        Ok(self)
    }

    /// Delimiter as the single byte the CSV reader expects
    ///
    /// Quotes and line terminators are rejected: the reader gives them
    /// their own meaning.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            return Err(EvalError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(EvalError::Config(format!(
                "delimiter cannot be a quote or line terminator, got {:?}",
                self.delimiter
            )));
        }
        Ok(self.delimiter as u8)
    }
}
