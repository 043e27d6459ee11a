//! CSV outputs: annotated table, failure ledger, and rule-table export.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, DataFrame};

use fieldcheck_ingest::{RULE_TABLE_HEADERS, any_to_string};
use fieldcheck_model::{FailureLedger, RuleTable};

/// Headers of the failure ledger CSV.
pub const LEDGER_HEADERS: [&str; 5] = ["Row", "Field", "Column", "Value", "Pattern"];

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
    }
    Ok(())
}

fn csv_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    ensure_parent(path)?;
    csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))
}

/// Write any DataFrame as CSV; nulls become empty cells.
pub fn write_frame_csv<W: Write>(df: &DataFrame, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    let columns = df.get_columns();
    writer.write_record(columns.iter().map(|column| column.name().as_str()))?;
    for idx in 0..df.height() {
        let record: Vec<String> = columns
            .iter()
            .map(|column| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the annotated table produced by a validation run.
pub fn write_annotated_csv(path: &Path, df: &DataFrame) -> Result<()> {
    ensure_parent(path)?;
    let file = fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_frame_csv(df, file).with_context(|| format!("write {}", path.display()))
}

/// Write the failure ledger, one row per failing value.
pub fn write_ledger_csv(path: &Path, ledger: &FailureLedger) -> Result<()> {
    let mut writer = csv_writer(path)?;
    writer.write_record(LEDGER_HEADERS)?;
    for entry in ledger {
        writer.write_record([
            entry.row.to_string().as_str(),
            entry.field.as_str(),
            entry.column.as_str(),
            entry.value.as_deref().unwrap_or_default(),
            entry.pattern.as_str(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Export a compiled rule table for review or hand editing.
pub fn write_rule_table_csv(path: &Path, table: &RuleTable) -> Result<()> {
    let mut writer = csv_writer(path)?;
    writer.write_record(RULE_TABLE_HEADERS)?;
    for rule in table {
        writer.write_record([
            rule.field_name.as_str(),
            rule.original_text.as_str(),
            rule.pattern.as_deref().unwrap_or_default(),
            rule.category.label(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
