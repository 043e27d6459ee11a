//! Rule-to-column binding.

use std::fmt;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fieldcheck_model::{ColumnBinding, RuleTable};

use crate::embedding::EmbeddingProvider;
use crate::resolver::{ColumnResolver, DEFAULT_FUZZY_THRESHOLD, ExactResolver, FuzzyResolver};
use crate::semantic::SemanticResolver;

/// Where semantic matching sits in the resolver order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticMode {
    /// Exact, then fuzzy.
    #[default]
    Off,
    /// Exact, fuzzy, then semantic.
    Fallback,
    /// Exact, semantic, then fuzzy. Suits abbreviated or divergent vocabularies.
    Preferred,
}

impl fmt::Display for SemanticMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Fallback => "fallback",
            Self::Preferred => "preferred",
        })
    }
}

/// Ordered list of resolvers; the first one to answer binds the field.
pub struct ColumnBinder {
    resolvers: Vec<Box<dyn ColumnResolver>>,
}

impl ColumnBinder {
    /// Exact then fuzzy matching at `threshold`.
    pub fn new(threshold: f32) -> Self {
        Self::from_resolvers(vec![
            Box::new(ExactResolver),
            Box::new(FuzzyResolver::new(threshold)),
        ])
    }

    /// Adds semantic matching according to `mode`.
    pub fn with_semantic(
        threshold: f32,
        mode: SemanticMode,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        let exact: Box<dyn ColumnResolver> = Box::new(ExactResolver);
        let fuzzy: Box<dyn ColumnResolver> = Box::new(FuzzyResolver::new(threshold));
        let semantic: Box<dyn ColumnResolver> = Box::new(SemanticResolver::new(provider));
        let resolvers = match mode {
            SemanticMode::Off => vec![exact, fuzzy],
            SemanticMode::Fallback => vec![exact, fuzzy, semantic],
            SemanticMode::Preferred => vec![exact, semantic, fuzzy],
        };
        Self::from_resolvers(resolvers)
    }

    pub fn from_resolvers(resolvers: Vec<Box<dyn ColumnResolver>>) -> Self {
        Self { resolvers }
    }

    pub fn resolver_names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|resolver| resolver.name()).collect()
    }

    /// Bind one field name.
    pub fn resolve(&self, field_name: &str, columns: &[String]) -> ColumnBinding {
        for resolver in &self.resolvers {
            if let Some(resolution) = resolver.resolve(field_name, columns) {
                debug!(
                    field = field_name,
                    column = %resolution.column,
                    strategy = resolver.name(),
                    score = resolution.score,
                    "bound field"
                );
                return ColumnBinding {
                    field_name: field_name.to_string(),
                    column: Some(resolution.column),
                    strategy: Some(resolution.strategy),
                    score: resolution.score,
                };
            }
        }
        warn!(field = field_name, "no column matches field");
        ColumnBinding::unresolved(field_name)
    }

    /// Bind every rule of `table`, in table order.
    pub fn bind_all(&self, table: &RuleTable, columns: &[String]) -> Vec<ColumnBinding> {
        table
            .iter()
            .map(|rule| self.resolve(&rule.field_name, columns))
            .collect()
    }
}

impl Default for ColumnBinder {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD)
    }
}

static DEFAULT_BINDER: LazyLock<ColumnBinder> = LazyLock::new(ColumnBinder::default);

/// Bind with the default binder (exact, then fuzzy at 0.7).
pub fn bind(field_name: &str, columns: &[String]) -> Option<String> {
    DEFAULT_BINDER.resolve(field_name, columns).column
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcheck_model::BindingStrategy;

    #[test]
    fn exact_beats_fuzzy() {
        let columns = vec!["zip_code".to_string(), "Zip Code".to_string()];
        let binding = ColumnBinder::default().resolve("Zip Code", &columns);
        assert_eq!(binding.column.as_deref(), Some("Zip Code"));
        assert_eq!(binding.strategy, Some(BindingStrategy::Exact));
    }

    #[test]
    fn default_order() {
        assert_eq!(ColumnBinder::default().resolver_names(), vec!["exact", "fuzzy"]);
    }

    #[test]
    fn semantic_mode_parses_lowercase() {
        let mode: SemanticMode = serde_json::from_str("\"preferred\"").unwrap();
        assert_eq!(mode, SemanticMode::Preferred);
        assert_eq!(SemanticMode::Fallback.to_string(), "fallback");
    }
}
