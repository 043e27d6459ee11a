//! Input table loading.
//!
//! Every column is read as UTF-8 text so values reach validation exactly as
//! written (leading zeros, signs, padding). Empty cells become nulls.

use std::path::Path;

use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Reads an input CSV into a DataFrame of string columns.
pub fn read_input_table(path: &Path) -> Result<DataFrame> {
    std::fs::metadata(path).map_err(|e| IngestError::io(path, e))?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.height() == 0 {
        warn!(path = %path.display(), "input table has no data rows");
    }
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded input table"
    );
    Ok(df)
}
