use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use fieldcheck_cli::config::{FileConfig, Overrides};
use fieldcheck_cli::pipeline::{
    RuleSource, build_binder, embedding_client, ensure_rules, load_rules, suggest_rules,
    validate_input,
};
use fieldcheck_ingest::RecordRange;
use fieldcheck_map::RuleSuggestion;
use fieldcheck_report::{OutputPaths, write_rule_table_csv};

use crate::cli::{RangeArgs, RulesArgs, SuggestArgs, ValidateArgs};
use crate::types::{RulesResult, ValidateResult};

fn record_range(args: RangeArgs) -> Result<RecordRange> {
    let range = RecordRange::new(args.first_record, args.last_record);
    range.validate()?;
    Ok(range)
}

fn load_config(config: Option<&Path>) -> Result<FileConfig> {
    let cwd = std::env::current_dir().context("resolve working directory")?;
    FileConfig::discover(config, &cwd)
}

pub fn run_validate(args: &ValidateArgs, config: Option<&Path>) -> Result<ValidateResult> {
    let settings = load_config(config)?.resolve(&Overrides {
        threshold: args.threshold,
        semantic: args.semantic.map(Into::into),
        output_dir: args.output_dir.clone(),
    })?;
    let source = match (&args.rules, &args.rule_table) {
        (Some(path), _) => RuleSource::Rulebook {
            path: path.clone(),
            range: record_range(args.range)?,
        },
        (None, Some(path)) => RuleSource::RuleTable { path: path.clone() },
        (None, None) => anyhow::bail!("either --rules or --rule-table is required"),
    };

    let rules = load_rules(&source)?;
    ensure_rules(&rules)?;
    let binder = build_binder(&settings)?;
    info!(
        rules = rules.len(),
        applicable = rules.applicable_count(),
        resolvers = ?binder.resolver_names(),
        semantic = %settings.semantic,
        "rule table ready"
    );

    let output_paths = OutputPaths::for_inputs(&settings.output_dir, &args.inputs);
    let mut inputs = Vec::new();
    let mut errors = Vec::new();
    for (input, paths) in args.inputs.iter().zip(&output_paths) {
        let start = Instant::now();
        let outputs = (!args.dry_run).then_some(paths);
        match validate_input(&rules, input, &binder, &settings, outputs) {
            Ok(outcome) => {
                info!(
                    input = %input.display(),
                    rows = outcome.run.rows(),
                    failures = outcome.run.ledger.len(),
                    duration_ms = start.elapsed().as_millis(),
                    "input validated"
                );
                inputs.push(outcome);
            }
            Err(error) => {
                warn!(input = %input.display(), error = %error, "input skipped");
                errors.push(format!("{}: {error:#}", input.display()));
            }
        }
    }

    let has_failures = !errors.is_empty() || inputs.iter().any(|outcome| outcome.run.has_failures());
    Ok(ValidateResult {
        rules,
        output_dir: settings.output_dir,
        inputs,
        errors,
        has_failures,
    })
}

pub fn run_rules(args: &RulesArgs) -> Result<RulesResult> {
    let span = info_span!("rules", rulebook = %args.rulebook.display());
    let _guard = span.enter();
    let rules = load_rules(&RuleSource::Rulebook {
        path: args.rulebook.clone(),
        range: record_range(args.range)?,
    })?;
    ensure_rules(&rules)?;
    if let Some(path) = &args.export {
        write_rule_table_csv(path, &rules)?;
        info!(path = %path.display(), rules = rules.len(), "exported rule table");
    }
    Ok(RulesResult {
        rules,
        exported: args.export.clone(),
    })
}

pub fn run_suggest(args: &SuggestArgs, config: Option<&Path>) -> Result<Vec<RuleSuggestion>> {
    let span = info_span!("suggest", input = %args.input.display());
    let _guard = span.enter();
    let settings = load_config(config)?.resolve(&Overrides::default())?;
    let client = embedding_client(&settings.embedding)?;
    suggest_rules(&client, &args.rules, &args.input)
}
