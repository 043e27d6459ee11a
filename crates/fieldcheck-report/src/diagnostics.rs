//! Append-only log of rule patterns that failed to compile.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use fieldcheck_model::PatternDiagnostic;

/// Headers of the diagnostics CSV.
pub const DIAGNOSTIC_HEADERS: [&str; 4] = ["Timestamp", "Field", "Pattern", "Error"];

/// Append `diagnostics` to the CSV at `path`.
///
/// The header is written only when the file is new or empty. Nothing is
/// touched when there is nothing to record. Returns the number of rows
/// appended.
pub fn append_pattern_diagnostics(path: &Path, diagnostics: &[PatternDiagnostic]) -> Result<usize> {
    if diagnostics.is_empty() {
        return Ok(0);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }

    let needs_header = std::fs::metadata(path).map_or(true, |meta| meta.len() == 0);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    if needs_header {
        writer.write_record(DIAGNOSTIC_HEADERS)?;
    }
    let timestamp = Utc::now().to_rfc3339();
    for diagnostic in diagnostics {
        writer.write_record([
            timestamp.as_str(),
            diagnostic.field.as_str(),
            diagnostic.pattern.as_str(),
            diagnostic.error.as_str(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("write {}", path.display()))?;

    info!(
        path = %path.display(),
        count = diagnostics.len(),
        "recorded invalid rule patterns"
    );
    Ok(diagnostics.len())
}
