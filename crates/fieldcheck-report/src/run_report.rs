//! JSON run report and the per-input output set.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use fieldcheck_model::{
    ColumnBinding, FailureLedger, PatternDiagnostic, RuleSummary, VerdictCounts,
};
use fieldcheck_validate::ValidationRun;

use crate::tables::{write_annotated_csv, write_ledger_csv};

const REPORT_SCHEMA: &str = "fieldcheck.run-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct RunReportPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    input: String,
    rows: usize,
    totals: VerdictCounts,
    bindings: &'a [ColumnBinding],
    summaries: &'a [RuleSummary],
    failures: &'a FailureLedger,
    invalid_patterns: &'a [PatternDiagnostic],
}

/// Render the JSON report for one run.
pub fn run_report_json(input: &Path, run: &ValidationRun) -> Result<String> {
    let payload = RunReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        input: input.display().to_string(),
        rows: run.rows(),
        totals: run.totals(),
        bindings: &run.bindings,
        summaries: &run.summaries,
        failures: &run.ledger,
        invalid_patterns: &run.diagnostics,
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

pub fn write_run_report_json(path: &Path, input: &Path, run: &ValidationRun) -> Result<()> {
    let json = run_report_json(input, run)?;
    std::fs::write(path, format!("{json}\n")).with_context(|| format!("write {}", path.display()))
}

/// Files written for one input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub annotated: PathBuf,
    pub failures: PathBuf,
    pub report: PathBuf,
}

impl OutputPaths {
    /// `NAME_validated.csv`, `NAME_failures.csv` and `NAME_report.json` for
    /// input `NAME.csv`.
    pub fn for_input(output_dir: &Path, input: &Path) -> Self {
        Self::for_stem(output_dir, input_stem(input))
    }

    fn for_stem(output_dir: &Path, stem: &str) -> Self {
        Self {
            annotated: output_dir.join(format!("{stem}_validated.csv")),
            failures: output_dir.join(format!("{stem}_failures.csv")),
            report: output_dir.join(format!("{stem}_report.json")),
        }
    }

    /// Output sets for every input of one run, index-aligned with `inputs`.
    ///
    /// Inputs sharing a file stem (`east/data.csv`, `west/data.csv`) get
    /// `_2`, `_3`, ... suffixes in input order, so no run output overwrites
    /// another.
    pub fn for_inputs(output_dir: &Path, inputs: &[PathBuf]) -> Vec<Self> {
        let mut taken: HashSet<String> = HashSet::new();
        inputs
            .iter()
            .map(|input| {
                let base = input_stem(input);
                let mut stem = base.to_string();
                let mut suffix = 1;
                while !taken.insert(stem.clone()) {
                    suffix += 1;
                    stem = format!("{base}_{suffix}");
                }
                if suffix > 1 {
                    warn!(
                        input = %input.display(),
                        stem = %stem,
                        "output name already used in this run, suffix added"
                    );
                }
                Self::for_stem(output_dir, &stem)
            })
            .collect()
    }
}

fn input_stem(input: &Path) -> &str {
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("input")
}

/// Write every output for one run to `paths`.
pub fn write_run_outputs(paths: &OutputPaths, input: &Path, run: &ValidationRun) -> Result<()> {
    if let Some(dir) = paths.annotated.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    write_annotated_csv(&paths.annotated, &run.annotated)?;
    write_ledger_csv(&paths.failures, &run.ledger)?;
    write_run_report_json(&paths.report, input, run)?;
    info!(
        input = %input.display(),
        annotated = %paths.annotated.display(),
        "wrote validation outputs"
    );
    Ok(())
}
