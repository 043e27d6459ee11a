//! Failure ledger and pattern diagnostics produced by a validation run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One failing (row, rule) evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    /// 1-based row index in the input table.
    pub row: usize,
    /// Rule field name.
    pub field: String,
    /// Input column the rule was bound to.
    pub column: String,
    /// Raw cell value; `None` for a missing value.
    pub value: Option<String>,
    /// Pattern the value was checked against.
    pub pattern: String,
}

/// All failures of one validation run, in rule order then row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureLedger {
    entries: Vec<FailureEntry>,
}

impl FailureLedger {
    pub fn push(&mut self, entry: FailureEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[FailureEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FailureEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.field == field)
    }

    /// Failure count per bound column.
    pub fn by_column(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.column.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a FailureLedger {
    type Item = &'a FailureEntry;
    type IntoIter = std::slice::Iter<'a, FailureEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A pattern that failed to compile at validation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDiagnostic {
    pub field: String,
    pub pattern: String,
    pub error: String,
}
