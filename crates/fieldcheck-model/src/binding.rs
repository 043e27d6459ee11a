use std::fmt;

use serde::{Deserialize, Serialize};

use crate::verdict::VerdictCounts;

/// Which resolver produced a column binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingStrategy {
    Exact,
    Fuzzy,
    Semantic,
}

impl fmt::Display for BindingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exact => "exact",
            Self::Fuzzy => "fuzzy",
            Self::Semantic => "semantic",
        })
    }
}

/// Resolved mapping from a rule's field name to an input column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnBinding {
    pub field_name: String,
    /// Bound column, `None` when unresolved.
    pub column: Option<String>,
    pub strategy: Option<BindingStrategy>,
    /// Resolver score (1.0 for exact matches, 0.0 when unresolved).
    pub score: f32,
}

impl ColumnBinding {
    pub fn unresolved(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            column: None,
            strategy: None,
            score: 0.0,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.column.is_some()
    }
}

/// Per-rule outcome summary for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub field: String,
    pub column: Option<String>,
    pub strategy: Option<BindingStrategy>,
    pub pattern: Option<String>,
    pub counts: VerdictCounts,
}
