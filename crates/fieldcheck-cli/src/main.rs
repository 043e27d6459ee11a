//! fieldcheck CLI.

use clap::{ColorChoice, Parser};
use fieldcheck_cli::logging::{LogConfig, LogFormat, init_logging};
use fieldcheck_validate::ValidationError;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_rules, run_suggest, run_validate};
use crate::summary::{print_interpretation, print_rules, print_suggestions, print_validate_summary};

const EXIT_OK: i32 = 0;
const EXIT_FAILURES: i32 = 1;
const EXIT_NO_RULES: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(EXIT_FAILURES);
    }
    let config = cli.config.as_deref();
    let exit_code = match &cli.command {
        Command::Validate(args) => match run_validate(args, config) {
            Ok(result) => {
                print_validate_summary(&result, args.max_failures);
                if result.has_failures {
                    EXIT_FAILURES
                } else {
                    EXIT_OK
                }
            }
            Err(error) => report_error(&error),
        },
        Command::Rules(args) => match run_rules(args) {
            Ok(result) => {
                print_rules(&result);
                EXIT_OK
            }
            Err(error) => report_error(&error),
        },
        Command::Interpret(args) => {
            print_interpretation(&args.text, &fieldcheck_rules::interpret(&args.text));
            EXIT_OK
        }
        Command::Suggest(args) => match run_suggest(args, config) {
            Ok(suggestions) => {
                print_suggestions(&suggestions);
                EXIT_OK
            }
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    match error.downcast_ref::<ValidationError>() {
        Some(ValidationError::NoRules) => EXIT_NO_RULES,
        _ => EXIT_FAILURES,
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
