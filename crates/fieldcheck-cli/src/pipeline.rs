//! Validation pipeline stages shared by the CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, info_span, trace, warn};

use fieldcheck_ingest::{
    RecordRange, column_names, load_rule_sentences, load_rule_table, load_rulebook,
    read_input_table,
};
use fieldcheck_map::{
    ColumnBinder, EmbeddingProvider, HttpEmbeddingClient, RuleIndex, RuleSuggestion, SemanticMode,
};
use fieldcheck_model::RuleTable;
use fieldcheck_report::{OutputPaths, append_pattern_diagnostics, write_run_outputs};
use fieldcheck_rules::compile;
use fieldcheck_validate::{ValidationError, ValidationRun, execute};

use crate::config::{EmbeddingSettings, Settings};
use crate::logging::redact_value;

/// Where the rules of a run come from.
#[derive(Debug, Clone)]
pub enum RuleSource {
    /// Free-text rulebook, compiled on load.
    Rulebook { path: PathBuf, range: RecordRange },
    /// Previously exported (and possibly edited) rule table.
    RuleTable { path: PathBuf },
}

/// Load and, for rulebooks, compile the rules.
pub fn load_rules(source: &RuleSource) -> Result<RuleTable> {
    match source {
        RuleSource::Rulebook { path, range } => {
            let span = info_span!("compile", rulebook = %path.display());
            let _guard = span.enter();
            let descriptions = load_rulebook(path, *range)
                .with_context(|| format!("load rulebook {}", path.display()))?;
            Ok(compile(&descriptions))
        }
        RuleSource::RuleTable { path } => {
            load_rule_table(path).with_context(|| format!("load rule table {}", path.display()))
        }
    }
}

/// Fail with [`ValidationError::NoRules`] when there is nothing to validate.
pub fn ensure_rules(table: &RuleTable) -> Result<()> {
    if table.is_empty() {
        return Err(ValidationError::NoRules.into());
    }
    Ok(())
}

pub fn embedding_client(settings: &EmbeddingSettings) -> Result<HttpEmbeddingClient> {
    HttpEmbeddingClient::new(settings.client_config()).context("create embedding client")
}

/// Binder for the configured threshold and semantic mode.
pub fn build_binder(settings: &Settings) -> Result<ColumnBinder> {
    if settings.semantic == SemanticMode::Off {
        return Ok(ColumnBinder::new(settings.threshold));
    }
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(embedding_client(&settings.embedding)?);
    Ok(ColumnBinder::with_semantic(
        settings.threshold,
        settings.semantic,
        provider,
    ))
}

/// Result of validating one input file.
#[derive(Debug)]
pub struct InputOutcome {
    pub input: PathBuf,
    pub run: ValidationRun,
    /// `None` on dry runs.
    pub outputs: Option<OutputPaths>,
    pub diagnostics_recorded: usize,
}

/// Read, validate and write outputs for one input.
///
/// `outputs` is `None` on dry runs, which write nothing.
pub fn validate_input(
    table: &RuleTable,
    input: &Path,
    binder: &ColumnBinder,
    settings: &Settings,
    outputs: Option<&OutputPaths>,
) -> Result<InputOutcome> {
    let span = info_span!("input", path = %input.display());
    let _guard = span.enter();

    let df = read_input_table(input).with_context(|| format!("read {}", input.display()))?;
    let run = execute(table, &df, binder)?;
    for entry in &run.ledger {
        trace!(
            row = entry.row,
            field = %entry.field,
            value = redact_value(entry.value.as_deref().unwrap_or_default()),
            "value failed its rule"
        );
    }

    let Some(paths) = outputs else {
        info!(failures = run.ledger.len(), "dry run, outputs skipped");
        return Ok(InputOutcome {
            input: input.to_path_buf(),
            run,
            outputs: None,
            diagnostics_recorded: 0,
        });
    };

    write_run_outputs(paths, input, &run)?;
    let diagnostics_recorded = append_pattern_diagnostics(&settings.diagnostics, &run.diagnostics)?;
    Ok(InputOutcome {
        input: input.to_path_buf(),
        run,
        outputs: Some(paths.clone()),
        diagnostics_recorded,
    })
}

/// Suggest a rule sentence for every column of `input`.
pub fn suggest_rules(
    provider: &dyn EmbeddingProvider,
    rulebook: &Path,
    input: &Path,
) -> Result<Vec<RuleSuggestion>> {
    let sentences = load_rule_sentences(rulebook)
        .with_context(|| format!("load rule sentences {}", rulebook.display()))?;
    if sentences.is_empty() {
        return Err(ValidationError::NoRules.into());
    }
    let df = read_input_table(input).with_context(|| format!("read {}", input.display()))?;
    let columns = column_names(&df);

    let index = RuleIndex::build(provider, &sentences);
    if index.is_empty() {
        warn!("no rule sentence could be embedded");
    }
    Ok(index.suggest(provider, &columns))
}
