use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one rule for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
    ColumnNotFound,
    RuleNotApplied,
    InvalidPattern,
}

impl Verdict {
    /// Label written into the annotated table.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::ColumnNotFound => "Column Not Found",
            Self::RuleNotApplied => "Rule Not Applied",
            Self::InvalidPattern => "Invalid Pattern",
        }
    }

    pub fn is_failure(self) -> bool {
        self == Self::Fail
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-rule tally of verdicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictCounts {
    pub pass: usize,
    pub fail: usize,
    pub column_not_found: usize,
    pub rule_not_applied: usize,
    pub invalid_pattern: usize,
}

impl VerdictCounts {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Pass => self.pass += 1,
            Verdict::Fail => self.fail += 1,
            Verdict::ColumnNotFound => self.column_not_found += 1,
            Verdict::RuleNotApplied => self.rule_not_applied += 1,
            Verdict::InvalidPattern => self.invalid_pattern += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pass + self.fail + self.column_not_found + self.rule_not_applied + self.invalid_pattern
    }
}
