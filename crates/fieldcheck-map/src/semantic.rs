//! Embedding-based column resolution.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use fieldcheck_model::BindingStrategy;

use crate::embedding::EmbeddingProvider;
use crate::resolver::{ColumnResolver, Resolution};
use crate::utils::{euclidean_distance, vector_at};

/// Picks the column whose name embedding is nearest to the field name.
///
/// Column embeddings are cached across calls, so binding a whole rule table
/// against one input sends each column name once. Provider failures are
/// logged and treated as "no embedding"; they never fail a binding.
pub struct SemanticResolver {
    provider: Arc<dyn EmbeddingProvider>,
    cache: Mutex<HashMap<String, Option<Vec<f32>>>>,
}

impl SemanticResolver {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn embed_one(&self, text: &str) -> Option<Vec<f32>> {
        match self.provider.embed(&[text.to_string()]) {
            Ok(vectors) => vector_at(&vectors, 0).map(<[f32]>::to_vec),
            Err(error) => {
                warn!(%error, "embedding request failed; semantic binding skipped");
                None
            }
        }
    }

    /// Embeddings for `columns`, fetching only the ones not cached yet.
    ///
    /// The cache lock is released while the provider runs.
    fn column_vectors(&self, columns: &[String]) -> Vec<Option<Vec<f32>>> {
        let missing: Vec<String> = {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            columns
                .iter()
                .filter(|column| !cache.contains_key(column.as_str()))
                .cloned()
                .collect()
        };

        let fetched: Vec<(String, Option<Vec<f32>>)> = if missing.is_empty() {
            Vec::new()
        } else {
            match self.provider.embed(&missing) {
                Ok(vectors) => missing
                    .into_iter()
                    .enumerate()
                    .map(|(idx, column)| (column, vector_at(&vectors, idx).map(<[f32]>::to_vec)))
                    .collect(),
                // Not cached, so a later call can try again.
                Err(error) => {
                    warn!(%error, "embedding request for columns failed");
                    Vec::new()
                }
            }
        };

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.extend(fetched);
        columns
            .iter()
            .map(|column| cache.get(column.as_str()).cloned().flatten())
            .collect()
    }
}

impl ColumnResolver for SemanticResolver {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn resolve(&self, field_name: &str, columns: &[String]) -> Option<Resolution> {
        if columns.is_empty() {
            return None;
        }
        let Some(field_vector) = self.embed_one(field_name) else {
            debug!(field = field_name, "no embedding for field name");
            return None;
        };

        let mut best: Option<(&String, f32)> = None;
        for (column, vector) in columns.iter().zip(self.column_vectors(columns)) {
            let Some(distance) = vector.and_then(|v| euclidean_distance(&field_vector, &v)) else {
                continue;
            };
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((column, distance));
            }
        }

        best.map(|(column, distance)| Resolution {
            column: column.clone(),
            strategy: BindingStrategy::Semantic,
            score: 1.0 / (1.0 + distance),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbeddingError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{OnceLock, Weak};

    /// Maps known words to fixed vectors and counts calls.
    struct WordVectors {
        calls: AtomicUsize,
    }

    impl EmbeddingProvider for WordVectors {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|text| match text.as_str() {
                    "Postal Code" => vec![1.0, 0.0],
                    "zip" => vec![0.9, 0.1],
                    "city" => vec![0.0, 1.0],
                    _ => Vec::new(),
                })
                .collect())
        }
    }

    #[test]
    fn nearest_column_wins_and_columns_are_cached() {
        let provider = Arc::new(WordVectors {
            calls: AtomicUsize::new(0),
        });
        let resolver = SemanticResolver::new(provider.clone());
        let columns = vec!["city".to_string(), "zip".to_string(), "notes".to_string()];

        let resolution = resolver.resolve("Postal Code", &columns).unwrap();
        assert_eq!(resolution.column, "zip");
        assert_eq!(resolution.strategy, BindingStrategy::Semantic);

        resolver.resolve("Postal Code", &columns).unwrap();
        // Two field lookups plus a single column batch.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    /// Records whether the resolver's cache was locked while embedding.
    struct LockWatcher {
        resolver: OnceLock<Weak<SemanticResolver>>,
        saw_locked_cache: AtomicBool,
    }

    impl EmbeddingProvider for LockWatcher {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            if let Some(resolver) = self.resolver.get().and_then(Weak::upgrade)
                && resolver.cache.try_lock().is_err()
            {
                self.saw_locked_cache.store(true, Ordering::SeqCst);
            }
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    #[test]
    fn cache_is_unlocked_while_embedding_columns() {
        let watcher = Arc::new(LockWatcher {
            resolver: OnceLock::new(),
            saw_locked_cache: AtomicBool::new(false),
        });
        let resolver = Arc::new(SemanticResolver::new(watcher.clone()));
        watcher.resolver.set(Arc::downgrade(&resolver)).unwrap();

        let columns = vec!["zip".to_string(), "city".to_string()];
        assert!(resolver.resolve("Postal Code", &columns).is_some());
        assert!(!watcher.saw_locked_cache.load(Ordering::SeqCst));
        assert_eq!(resolver.cache.lock().unwrap().len(), 2);
    }

    #[test]
    fn unknown_field_is_unresolved() {
        let resolver = SemanticResolver::new(Arc::new(WordVectors {
            calls: AtomicUsize::new(0),
        }));
        assert!(resolver.resolve("mystery", &["zip".to_string()]).is_none());
    }
}
