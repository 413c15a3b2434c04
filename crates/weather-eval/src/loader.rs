//! Record loading for predictions and ground truth
//!
//! Loaders turn files into plain in-memory records; the evaluator only ever sees
//! records, so alternate input formats plug in behind [`RecordSource`].

use crate::error::{EvalError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One row of the predictions file, keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionRecord {
    fields: HashMap<String, String>,
}

impl PredictionRecord {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Value of `field`, if the record has that column
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PredictionRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One reference sample, aligned by position with the prediction rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundTruthRecord {
    fields: Map<String, Value>,
}

impl GroundTruthRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw JSON value of `field`, if present
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for GroundTruthRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Supplies the two record collections an evaluation consumes
pub trait RecordSource {
    fn predictions(&self) -> Result<Vec<PredictionRecord>>;
    fn ground_truth(&self) -> Result<Vec<GroundTruthRecord>>;
}

/// Records read from a predictions file and a ground-truth file
#[derive(Debug, Clone)]
pub struct FileSource {
    pub predictions_path: PathBuf,
    pub ground_truth_path: PathBuf,
    pub delimiter: u8,
}

impl FileSource {
    pub fn new(predictions_path: impl Into<PathBuf>, ground_truth_path: impl Into<PathBuf>) -> Self {
        Self {
            predictions_path: predictions_path.into(),
            ground_truth_path: ground_truth_path.into(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl RecordSource for FileSource {
    fn predictions(&self) -> Result<Vec<PredictionRecord>> {
        load_predictions(&self.predictions_path, self.delimiter)
    }

    fn ground_truth(&self) -> Result<Vec<GroundTruthRecord>> {
        load_ground_truth(&self.ground_truth_path)
    }
}

/// Records already held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub predictions: Vec<PredictionRecord>,
    pub ground_truth: Vec<GroundTruthRecord>,
}

impl RecordSource for InMemorySource {
    fn predictions(&self) -> Result<Vec<PredictionRecord>> {
        Ok(self.predictions.clone())
    }

    fn ground_truth(&self) -> Result<Vec<GroundTruthRecord>> {
        Ok(self.ground_truth.clone())
    }
}

/// Load prediction rows from a delimited file with a header row
///
/// # Arguments
/// * `path` - Path to the predictions file
/// * `delimiter` - Field delimiter byte (`b','` for CSV)
///
/// # Returns
/// One record per data row, in file order
pub fn load_predictions(path: &Path, delimiter: u8) -> Result<Vec<PredictionRecord>> {
    let file = File::open(path).map_err(|e| EvalError::from_io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| EvalError::file_format(path, e))?
        .clone();

    let mut records = Vec::new();
    for (row_num, result) in reader.records().enumerate() {
        let row = result
            .map_err(|e| EvalError::file_format(path, format!("row {}: {}", row_num + 1, e)))?;
        records.push(
            headers
                .iter()
                .zip(row.iter())
                .collect::<PredictionRecord>(),
        );
    }

    debug!(path = ?path, rows = records.len(), "loaded predictions");
    Ok(records)
}

/// Load reference records from a JSON array of objects
///
/// A `.jsonl` path is read as JSON Lines instead: one object per non-blank line.
pub fn load_ground_truth(path: &Path) -> Result<Vec<GroundTruthRecord>> {
    let records = if path.extension().is_some_and(|ext| ext == "jsonl") {
        load_ground_truth_lines(path)?
    } else {
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::from_io(path, e))?;
        let objects: Vec<Map<String, Value>> =
            serde_json::from_str(&content).map_err(|e| EvalError::file_format(path, e))?;
        objects.into_iter().map(GroundTruthRecord::new).collect()
    };

    debug!(path = ?path, records = records.len(), "loaded ground truth");
    Ok(records)
}

fn load_ground_truth_lines(path: &Path) -> Result<Vec<GroundTruthRecord>> {
    let file = File::open(path).map_err(|e| EvalError::from_io(path, e))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| EvalError::file_format(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let object: Map<String, Value> = serde_json::from_str(&line)
            .map_err(|e| EvalError::file_format(path, format!("line {}: {}", line_num + 1, e)))?;
        records.push(GroundTruthRecord::new(object));
    }
    Ok(records)
}
