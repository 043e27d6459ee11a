//! Rule descriptions and their compiled form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A raw, human-authored constraint for one data field.
///
/// Produced by rulebook ingestion and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDescription {
    /// Field name as written in the rulebook (may contain line breaks).
    pub field_name: String,
    /// Prose description of the field.
    #[serde(default)]
    pub description: String,
    /// Free-text statement of the allowable values.
    #[serde(default)]
    pub allowable_values: String,
}

impl RuleDescription {
    pub fn new(
        field_name: impl Into<String>,
        description: impl Into<String>,
        allowable_values: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            description: description.into(),
            allowable_values: allowable_values.into(),
        }
    }

    /// Text handed to the interpreter.
    ///
    /// The allowable-values column carries the constraint; the description is
    /// only used when that column is blank.
    pub fn rule_text(&self) -> &str {
        if self.allowable_values.trim().is_empty() {
            &self.description
        } else {
            &self.allowable_values
        }
    }
}

/// Category of an interpreted rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    WholeDollarAmount,
    UsZipCode,
    InternationalPostalCode,
    PositiveAmount,
    WholeNumber,
    SignedAmount,
    NumericAmount,
    /// Exactly five digits, without a ZIP context.
    FiveDigitCode,
    CountryCode,
    ZipPlusFour,
    IsoDate,
    Alphanumeric,
    ForbiddenCharacters,
    /// Pattern supplied directly in an edited rule table.
    Custom,
    NotApplicable,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 15] = [
        RuleCategory::WholeDollarAmount,
        RuleCategory::UsZipCode,
        RuleCategory::InternationalPostalCode,
        RuleCategory::PositiveAmount,
        RuleCategory::WholeNumber,
        RuleCategory::SignedAmount,
        RuleCategory::NumericAmount,
        RuleCategory::FiveDigitCode,
        RuleCategory::CountryCode,
        RuleCategory::ZipPlusFour,
        RuleCategory::IsoDate,
        RuleCategory::Alphanumeric,
        RuleCategory::ForbiddenCharacters,
        RuleCategory::Custom,
        RuleCategory::NotApplicable,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::WholeDollarAmount => "Whole dollar amount",
            Self::UsZipCode => "US ZIP code",
            Self::InternationalPostalCode => "International postal code",
            Self::PositiveAmount => "Positive amount",
            Self::WholeNumber => "Whole number",
            Self::SignedAmount => "Signed amount",
            Self::NumericAmount => "Numeric amount",
            Self::FiveDigitCode => "Five digit code",
            Self::CountryCode => "Country code",
            Self::ZipPlusFour => "ZIP+4 code",
            Self::IsoDate => "ISO date",
            Self::Alphanumeric => "Alphanumeric",
            Self::ForbiddenCharacters => "Forbidden characters",
            Self::Custom => "Custom pattern",
            Self::NotApplicable => "Not applicable",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RuleCategory {
    type Err = ModelError;

    /// Accepts either the label or the snake_case name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RuleCategory::ALL
            .into_iter()
            .find(|category| {
                category.label().eq_ignore_ascii_case(wanted)
                    || snake_name(*category).eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ModelError::UnknownCategory(wanted.to_string()))
    }
}

fn snake_name(category: RuleCategory) -> &'static str {
    match category {
        RuleCategory::WholeDollarAmount => "whole_dollar_amount",
        RuleCategory::UsZipCode => "us_zip_code",
        RuleCategory::InternationalPostalCode => "international_postal_code",
        RuleCategory::PositiveAmount => "positive_amount",
        RuleCategory::WholeNumber => "whole_number",
        RuleCategory::SignedAmount => "signed_amount",
        RuleCategory::NumericAmount => "numeric_amount",
        RuleCategory::FiveDigitCode => "five_digit_code",
        RuleCategory::CountryCode => "country_code",
        RuleCategory::ZipPlusFour => "zip_plus_four",
        RuleCategory::IsoDate => "iso_date",
        RuleCategory::Alphanumeric => "alphanumeric",
        RuleCategory::ForbiddenCharacters => "forbidden_characters",
        RuleCategory::Custom => "custom",
        RuleCategory::NotApplicable => "not_applicable",
    }
}

/// Executable form of a [`RuleDescription`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledRule {
    /// Normalized field name; unique within a [`RuleTable`].
    pub field_name: String,
    /// Rule text the pattern was derived from.
    pub original_text: String,
    /// Pattern source, `None` when no heuristic applied.
    pub pattern: Option<String>,
    pub category: RuleCategory,
}

impl CompiledRule {
    /// A rule that will be reported as "Rule Not Applied".
    pub fn not_applicable(field_name: impl Into<String>, original_text: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            original_text: original_text.into(),
            pattern: None,
            category: RuleCategory::NotApplicable,
        }
    }

    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }
}

/// Ordered set of compiled rules, one per field.
///
/// Built once per rulebook and shared read-only across validation runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<CompiledRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<CompiledRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompiledRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Case-sensitive lookup by field name.
    pub fn get(&self, field_name: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|rule| rule.field_name == field_name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.rules
            .iter()
            .map(|rule| rule.field_name.as_str())
            .collect()
    }

    /// Number of rules that carry an executable pattern.
    pub fn applicable_count(&self) -> usize {
        self.rules.iter().filter(|rule| rule.has_pattern()).count()
    }
}

impl<'a> IntoIterator for &'a RuleTable {
    type Item = &'a CompiledRule;
    type IntoIter = std::slice::Iter<'a, CompiledRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
