use std::path::PathBuf;

use fieldcheck_cli::pipeline::InputOutcome;
use fieldcheck_model::RuleTable;

#[derive(Debug)]
pub struct ValidateResult {
    pub rules: RuleTable,
    pub output_dir: PathBuf,
    pub inputs: Vec<InputOutcome>,
    /// Inputs that could not be processed, with the reason.
    pub errors: Vec<String>,
    pub has_failures: bool,
}

#[derive(Debug)]
pub struct RulesResult {
    pub rules: RuleTable,
    pub exported: Option<PathBuf>,
}
