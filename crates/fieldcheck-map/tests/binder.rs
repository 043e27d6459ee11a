//! Column binding across resolver orders.

use std::sync::Arc;

use fieldcheck_map::{
    ColumnBinder, EmbeddingError, EmbeddingProvider, RuleIndex, SemanticMode, bind,
};
use fieldcheck_model::{BindingStrategy, CompiledRule, RuleCategory, RuleTable};

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Embeds a fixed vocabulary; everything else gets no vector.
struct Vocabulary;

impl EmbeddingProvider for Vocabulary {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|text| match text.as_str() {
                "Postal Code" | "PC" => vec![1.0, 0.0, 0.0],
                "Amount" | "AMT" => vec![0.0, 1.0, 0.0],
                "Notes" | "Comments" => vec![0.0, 0.0, 1.0],
                "Amount must be positive" => vec![0.1, 0.9, 0.0],
                "Postal code must have 5 digits" => vec![0.9, 0.0, 0.1],
                _ => Vec::new(),
            })
            .collect())
    }
}

struct Unreachable;

impl EmbeddingProvider for Unreachable {
    fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Network("connection refused".to_string()))
    }
}

fn rule(field: &str) -> CompiledRule {
    CompiledRule {
        field_name: field.to_string(),
        original_text: String::new(),
        pattern: Some(r"^\d+$".to_string()),
        category: RuleCategory::WholeNumber,
    }
}

#[test]
fn default_bind_examples() {
    assert_eq!(
        bind("ZIP Code", &columns(&["zip_code", "city"])).as_deref(),
        Some("zip_code")
    );
    assert_eq!(bind("ZIP Code", &columns(&["unrelated_col"])), None);
    assert_eq!(bind("Zip", &[]), None);
}

#[test]
fn fallback_uses_embeddings_after_fuzzy_fails() {
    let binder = ColumnBinder::with_semantic(0.7, SemanticMode::Fallback, Arc::new(Vocabulary));
    let binding = binder.resolve("Postal Code", &columns(&["AMT", "PC"]));
    assert_eq!(binding.column.as_deref(), Some("PC"));
    assert_eq!(binding.strategy, Some(BindingStrategy::Semantic));
}

#[test]
fn preferred_consults_embeddings_before_fuzzy() {
    let binder = ColumnBinder::with_semantic(0.7, SemanticMode::Preferred, Arc::new(Vocabulary));
    assert_eq!(binder.resolver_names(), vec!["exact", "semantic", "fuzzy"]);

    // "Note" is a strong fuzzy match, but the embedding points at "Comments".
    let binding = binder.resolve("Notes", &columns(&["Note", "Comments"]));
    assert_eq!(binding.column.as_deref(), Some("Comments"));
}

#[test]
fn provider_failure_falls_back_to_unresolved() {
    let binder = ColumnBinder::with_semantic(0.7, SemanticMode::Fallback, Arc::new(Unreachable));
    let binding = binder.resolve("Postal Code", &columns(&["AMT", "PC"]));
    assert!(!binding.is_resolved());

    let binder = ColumnBinder::with_semantic(0.7, SemanticMode::Preferred, Arc::new(Unreachable));
    let binding = binder.resolve("ZIP Code", &columns(&["zip_code"]));
    assert_eq!(binding.strategy, Some(BindingStrategy::Fuzzy));
}

#[test]
fn bind_all_follows_table_order() {
    let table = RuleTable::new(vec![rule("Amount"), rule("Zip"), rule("Customer ID")]);
    let bindings = ColumnBinder::default().bind_all(&table, &columns(&["customer_id", "Amount"]));

    let bound: Vec<_> = bindings.iter().map(|b| b.column.as_deref()).collect();
    assert_eq!(bound, vec![Some("Amount"), None, Some("customer_id")]);
    assert_eq!(bindings[1].field_name, "Zip");
}

#[test]
fn rule_index_suggests_nearest_sentence() {
    let sentences = vec![
        "Amount must be positive".to_string(),
        "Postal code must have 5 digits".to_string(),
        "Unembeddable must stay out".to_string(),
    ];
    let index = RuleIndex::build(&Vocabulary, &sentences);
    assert_eq!(index.len(), 2);

    let suggestions = index.suggest(&Vocabulary, &columns(&["AMT", "PC", "mystery"]));
    assert_eq!(
        suggestions[0].rule.as_deref(),
        Some("Amount must be positive")
    );
    assert_eq!(
        suggestions[1].rule.as_deref(),
        Some("Postal code must have 5 digits")
    );
    assert_eq!(suggestions[2].rule, None);
}

#[test]
fn rule_index_survives_provider_failure() {
    let index = RuleIndex::build(&Unreachable, &["Amount must be positive".to_string()]);
    assert!(index.is_empty());
    let suggestions = index.suggest(&Unreachable, &columns(&["AMT"]));
    assert_eq!(suggestions[0].rule, None);
}
