//! Column resolution strategies.
//!
//! A [`ColumnResolver`] picks at most one input column for a rule's field
//! name. [`ColumnBinder`](crate::ColumnBinder) tries resolvers in priority
//! order and keeps the first answer.

use rapidfuzz::distance::indel;
use tracing::trace;

use fieldcheck_model::BindingStrategy;

use crate::utils::normalize_text;

/// Default minimum similarity for a fuzzy binding.
pub const DEFAULT_FUZZY_THRESHOLD: f32 = 0.7;

/// A column chosen by a resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub column: String,
    pub strategy: BindingStrategy,
    pub score: f32,
}

/// One way of matching a field name against the available columns.
pub trait ColumnResolver: Send + Sync {
    fn name(&self) -> &'static str;

    fn resolve(&self, field_name: &str, columns: &[String]) -> Option<Resolution>;
}

/// Case-sensitive equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactResolver;

impl ColumnResolver for ExactResolver {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn resolve(&self, field_name: &str, columns: &[String]) -> Option<Resolution> {
        columns
            .iter()
            .find(|column| column.as_str() == field_name)
            .map(|column| Resolution {
                column: column.clone(),
                strategy: BindingStrategy::Exact,
                score: 1.0,
            })
    }
}

/// Normalized string similarity above a threshold.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyResolver {
    threshold: f32,
}

impl FuzzyResolver {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Similarity of two names in `[0, 1]` after normalization.
    pub fn similarity(a: &str, b: &str) -> f32 {
        let a = normalize_text(a);
        let b = normalize_text(b);
        if a.is_empty() && b.is_empty() {
            return 0.0;
        }
        indel::normalized_similarity(a.chars(), b.chars()) as f32
    }
}

impl Default for FuzzyResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD)
    }
}

impl ColumnResolver for FuzzyResolver {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn resolve(&self, field_name: &str, columns: &[String]) -> Option<Resolution> {
        let mut best: Option<(&String, f32)> = None;
        for column in columns {
            let score = Self::similarity(field_name, column);
            trace!(field = field_name, column = %column, score, "fuzzy score");
            // Strictly greater keeps the earlier column on ties.
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((column, score));
            }
        }
        let (column, score) = best?;
        (score >= self.threshold).then(|| Resolution {
            column: column.clone(),
            strategy: BindingStrategy::Fuzzy,
            score,
        })
    }
}
