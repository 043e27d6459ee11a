//! Error types for rulebook and input loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading rulebooks, rule tables, or input data.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Failed to parse an input CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to read a rulebook or rule-table CSV record.
    #[error("invalid CSV record in {path}: {source}")]
    CsvRecord {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to parse a JSON rulebook.
    #[error("invalid JSON rulebook {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Required column not found in a rulebook or rule table.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// File extension does not name a known rulebook format.
    #[error("unsupported rulebook format: {path} (expected .csv, .json, .txt or .md)")]
    UnsupportedFormat { path: PathBuf },

    // === Selection Errors ===
    /// Record range is empty or starts at zero.
    #[error("invalid record range {first}..={last}")]
    InvalidRange { first: usize, last: usize },
}

impl IngestError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/rules.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /path/to/rules.csv");
    }

    #[test]
    fn test_not_found_io_error_maps_to_file_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = IngestError::io(std::path::Path::new("missing.csv"), io);
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }
}
