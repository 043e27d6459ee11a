pub mod binding;
pub mod error;
pub mod ledger;
pub mod rule;
pub mod verdict;

pub use binding::{BindingStrategy, ColumnBinding, RuleSummary};
pub use error::{ModelError, Result};
pub use ledger::{FailureEntry, FailureLedger, PatternDiagnostic};
pub use rule::{CompiledRule, RuleCategory, RuleDescription, RuleTable};
pub use verdict::{Verdict, VerdictCounts};
