//! CLI argument definitions for fieldcheck.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use fieldcheck_map::SemanticMode;

#[derive(Parser)]
#[command(
    name = "fieldcheck",
    version,
    about = "Validate CSV files against plain-language field rules",
    long_about = "Validate CSV files against plain-language field rules.\n\n\
                  Rules such as \"5 digit zip code\" are compiled to regular expressions,\n\
                  bound to input columns by exact, fuzzy or semantic matching, and\n\
                  evaluated for every row."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Config file (default: fieldcheck.toml in the working directory, if present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate one or more CSV files.
    Validate(ValidateArgs),

    /// Compile a rulebook and list (or export) the rule table.
    Rules(RulesArgs),

    /// Show the pattern derived from one rule description.
    Interpret(InterpretArgs),

    /// Suggest the closest rule sentence for each input column.
    Suggest(SuggestArgs),
}

/// First/last record selection for rulebooks.
#[derive(Args, Clone, Copy)]
pub struct RangeArgs {
    /// First rulebook record to use (1-based).
    #[arg(long = "first-record", value_name = "N")]
    pub first_record: Option<usize>,

    /// Last rulebook record to use (1-based, inclusive).
    #[arg(long = "last-record", value_name = "N")]
    pub last_record: Option<usize>,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Rulebook (CSV, JSON or text) compiled before validation.
    #[arg(long = "rules", value_name = "RULEBOOK", conflicts_with = "rule_table")]
    pub rules: Option<PathBuf>,

    /// Exported rule table to use instead of a rulebook.
    #[arg(long = "rule-table", value_name = "CSV", required_unless_present = "rules")]
    pub rule_table: Option<PathBuf>,

    /// CSV files to validate.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory (default from config, else ./fieldcheck-output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Minimum fuzzy similarity for binding a field to a column.
    #[arg(long = "threshold", value_name = "SCORE")]
    pub threshold: Option<f32>,

    /// Semantic column matching.
    #[arg(long = "semantic", value_enum)]
    pub semantic: Option<SemanticArg>,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Validate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Maximum failing values listed in the terminal summary.
    #[arg(long = "max-failures", value_name = "N", default_value_t = 20)]
    pub max_failures: usize,
}

#[derive(Args)]
pub struct RulesArgs {
    /// Rulebook to compile.
    #[arg(value_name = "RULEBOOK")]
    pub rulebook: PathBuf,

    /// Write the compiled rule table to this CSV.
    #[arg(long = "export", value_name = "CSV")]
    pub export: Option<PathBuf>,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Args)]
pub struct InterpretArgs {
    /// Rule description, e.g. "5 digit zip code".
    #[arg(value_name = "TEXT")]
    pub text: String,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Text rulebook; lines containing "must" are rule sentences.
    #[arg(long = "rules", value_name = "RULEBOOK")]
    pub rules: PathBuf,

    /// CSV whose header supplies the column names.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

/// CLI semantic matching choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum SemanticArg {
    Off,
    Fallback,
    Preferred,
}

impl From<SemanticArg> for SemanticMode {
    fn from(arg: SemanticArg) -> Self {
        match arg {
            SemanticArg::Off => SemanticMode::Off,
            SemanticArg::Fallback => SemanticMode::Fallback,
            SemanticArg::Preferred => SemanticMode::Preferred,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
