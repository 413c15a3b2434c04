//! Error types for loading records and scoring predictions

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during an evaluation run
///
/// Every variant is fatal for the run that raised it.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Input file not found: {path:?}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse {path:?}: {reason}")]
    FileFormat { path: PathBuf, reason: String },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Predictions and ground truth must have same length for '{language}': {predicted} predicted vs {reference} reference"
    )]
    LengthMismatch {
        language: String,
        predicted: usize,
        reference: usize,
    },

    #[error("Invalid '{field}' in record {index} for '{language}': {reason}")]
    InvalidField {
        language: String,
        field: String,
        index: usize,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl EvalError {
    /// Map an I/O failure on `path`, keeping a missing file distinct from other failures
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            EvalError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            EvalError::Io {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }

    pub(crate) fn file_format(path: &std::path::Path, reason: impl ToString) -> Self {
        EvalError::FileFormat {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let mapped = EvalError::from_io(Path::new("preds.csv"), err);
        assert!(matches!(mapped, EvalError::NotFound { ref path } if path == Path::new("preds.csv")));
    }

    #[test]
    fn test_other_io_errors_keep_source() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let mapped = EvalError::from_io(Path::new("gt.json"), err);
        assert!(matches!(mapped, EvalError::Io { .. }));
        assert!(mapped.to_string().contains("gt.json"));
    }
}
