//! Validation Executor
//!
//! Applies every rule of a [`RuleTable`] to one input table. Each rule is
//! evaluated independently: a rule whose column cannot be bound, whose
//! pattern is missing, or whose pattern does not compile only affects its own
//! verdict column.

use polars::prelude::*;
use regex::Regex;
use tracing::{debug, info, info_span, warn};

use fieldcheck_ingest::{cell_value, column_names};
use fieldcheck_map::ColumnBinder;
use fieldcheck_model::{
    ColumnBinding, CompiledRule, FailureEntry, FailureLedger, PatternDiagnostic, RuleSummary,
    RuleTable, Verdict, VerdictCounts,
};

use crate::error::{Result, ValidationError};

/// Suffix of the per-rule verdict columns in the annotated table.
pub const VALIDATION_SUFFIX: &str = "_validation";

/// Name of the verdict column for `field_name`.
pub fn validation_column_name(field_name: &str) -> String {
    format!("{field_name}{VALIDATION_SUFFIX}")
}

/// Everything one validation run produces.
#[derive(Debug, Clone)]
pub struct ValidationRun {
    /// Input table plus one verdict column per rule.
    pub annotated: DataFrame,
    pub ledger: FailureLedger,
    pub diagnostics: Vec<PatternDiagnostic>,
    /// One binding per rule, in table order.
    pub bindings: Vec<ColumnBinding>,
    /// One summary per rule, in table order.
    pub summaries: Vec<RuleSummary>,
}

impl ValidationRun {
    /// True when at least one value failed its rule.
    pub fn has_failures(&self) -> bool {
        !self.ledger.is_empty()
    }

    pub fn rows(&self) -> usize {
        self.annotated.height()
    }

    /// Verdict totals across all rules.
    pub fn totals(&self) -> VerdictCounts {
        let mut totals = VerdictCounts::default();
        for summary in &self.summaries {
            totals.pass += summary.counts.pass;
            totals.fail += summary.counts.fail;
            totals.column_not_found += summary.counts.column_not_found;
            totals.rule_not_applied += summary.counts.rule_not_applied;
            totals.invalid_pattern += summary.counts.invalid_pattern;
        }
        totals
    }
}

/// Validate `df` against every rule in `table`.
///
/// Fails only when `table` is empty or the annotated table cannot be
/// assembled.
pub fn execute(table: &RuleTable, df: &DataFrame, binder: &ColumnBinder) -> Result<ValidationRun> {
    if table.is_empty() {
        return Err(ValidationError::NoRules);
    }

    let span = info_span!("validate", rules = table.len(), rows = df.height());
    let _guard = span.enter();

    let columns = column_names(df);
    let bindings = binder.bind_all(table, &columns);

    let mut annotated = df.clone();
    let mut ledger = FailureLedger::default();
    let mut diagnostics = Vec::new();
    let mut summaries = Vec::with_capacity(table.len());

    for (rule, binding) in table.iter().zip(&bindings) {
        let verdicts = evaluate_rule(rule, binding, df, &mut ledger, &mut diagnostics);

        let mut counts = VerdictCounts::default();
        for verdict in &verdicts {
            counts.record(*verdict);
        }
        debug!(
            field = %rule.field_name,
            pass = counts.pass,
            fail = counts.fail,
            "rule evaluated"
        );

        let labels: Vec<&str> = verdicts.iter().map(|verdict| verdict.label()).collect();
        annotated.with_column(Column::new(
            validation_column_name(&rule.field_name).into(),
            labels,
        ))?;

        summaries.push(RuleSummary {
            field: rule.field_name.clone(),
            column: binding.column.clone(),
            strategy: binding.strategy,
            pattern: rule.pattern.clone(),
            counts,
        });
    }

    info!(
        rules = table.len(),
        rows = df.height(),
        failures = ledger.len(),
        invalid_patterns = diagnostics.len(),
        "validation complete"
    );

    Ok(ValidationRun {
        annotated,
        ledger,
        diagnostics,
        bindings,
        summaries,
    })
}

fn evaluate_rule(
    rule: &CompiledRule,
    binding: &ColumnBinding,
    df: &DataFrame,
    ledger: &mut FailureLedger,
    diagnostics: &mut Vec<PatternDiagnostic>,
) -> Vec<Verdict> {
    let height = df.height();

    let Some(column) = binding.column.as_deref() else {
        return vec![Verdict::ColumnNotFound; height];
    };
    let Some(pattern) = rule.pattern.as_deref() else {
        return vec![Verdict::RuleNotApplied; height];
    };

    let regex = match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(regex) => regex,
        Err(error) => {
            warn!(field = %rule.field_name, %error, "rule pattern does not compile");
            diagnostics.push(PatternDiagnostic {
                field: rule.field_name.clone(),
                pattern: pattern.to_string(),
                error: error.to_string(),
            });
            return vec![Verdict::InvalidPattern; height];
        }
    };

    let series = match df.column(column) {
        Ok(series) => series,
        Err(error) => {
            warn!(field = %rule.field_name, column, %error, "bound column could not be read");
            return vec![Verdict::ColumnNotFound; height];
        }
    };

    (0..height)
        .map(|idx| {
            let value = cell_value(series, idx);
            let passed = value
                .as_deref()
                .is_some_and(|raw| regex.is_match(raw.trim()));
            if passed {
                return Verdict::Pass;
            }
            ledger.push(FailureEntry {
                row: idx + 1,
                field: rule.field_name.clone(),
                column: column.to_string(),
                value,
                pattern: pattern.to_string(),
            });
            Verdict::Fail
        })
        .collect()
}
