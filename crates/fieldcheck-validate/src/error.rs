//! Error types for validation runs.

use thiserror::Error;

/// Errors that abort a whole validation run.
///
/// Problems with a single rule (unbound column, bad pattern, missing value)
/// are reported as verdicts instead.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The rule table is empty.
    #[error("no rules available; load a rulebook or rule table first")]
    NoRules,

    /// Building the annotated table failed.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for ValidationError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;
