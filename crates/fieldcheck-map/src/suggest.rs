//! Nearest rule sentence for each input column.

use serde::Serialize;
use tracing::{info, warn};

use crate::embedding::EmbeddingProvider;
use crate::utils::{euclidean_distance, vector_at};

/// Rule sentence suggested for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSuggestion {
    pub column: String,
    /// `None` when the column or every sentence lacked an embedding.
    pub rule: Option<String>,
    pub distance: Option<f32>,
}

/// Embedded rule sentences searched by L2 distance.
pub struct RuleIndex {
    entries: Vec<(String, Vec<f32>)>,
}

impl RuleIndex {
    /// Embed every sentence. Sentences without an embedding are left out of
    /// the index; a failing provider yields an empty index.
    pub fn build(provider: &dyn EmbeddingProvider, sentences: &[String]) -> Self {
        let vectors = provider.embed(sentences).unwrap_or_else(|error| {
            warn!(%error, "could not embed rule sentences");
            Vec::new()
        });
        let entries: Vec<(String, Vec<f32>)> = sentences
            .iter()
            .enumerate()
            .filter_map(|(idx, sentence)| {
                vector_at(&vectors, idx).map(|vector| (sentence.clone(), vector.to_vec()))
            })
            .collect();
        info!(
            sentences = sentences.len(),
            indexed = entries.len(),
            "built rule index"
        );
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nearest sentence to `vector`.
    pub fn nearest(&self, vector: &[f32]) -> Option<(&str, f32)> {
        let mut best: Option<(&str, f32)> = None;
        for (sentence, candidate) in &self.entries {
            let Some(distance) = euclidean_distance(vector, candidate) else {
                continue;
            };
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((sentence.as_str(), distance));
            }
        }
        best
    }

    /// Suggest a rule sentence for every column, in column order.
    pub fn suggest(&self, provider: &dyn EmbeddingProvider, columns: &[String]) -> Vec<RuleSuggestion> {
        let vectors = provider.embed(columns).unwrap_or_else(|error| {
            warn!(%error, "could not embed column names");
            Vec::new()
        });
        columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let nearest = vector_at(&vectors, idx).and_then(|vector| self.nearest(vector));
                RuleSuggestion {
                    column: column.clone(),
                    rule: nearest.map(|(sentence, _)| sentence.to_string()),
                    distance: nearest.map(|(_, distance)| distance),
                }
            })
            .collect()
    }
}
