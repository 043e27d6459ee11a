//! Binding of rule field names to input columns.
//!
//! Rulebooks and data files rarely agree on naming, so each rule is bound by
//! trying [`ColumnResolver`]s in order: exact name, fuzzy name similarity,
//! and optionally nearest-neighbour search over text embeddings.

#![deny(unsafe_code)]

pub mod binder;
pub mod embedding;
pub mod resolver;
pub mod semantic;
pub mod suggest;
pub mod utils;

pub use binder::{ColumnBinder, SemanticMode, bind};
pub use embedding::{
    DEFAULT_BATCH_SIZE, DEFAULT_ENDPOINT, DEFAULT_MODEL, EmbeddingConfig, EmbeddingError,
    EmbeddingProvider, HttpEmbeddingClient,
};
pub use resolver::{
    ColumnResolver, DEFAULT_FUZZY_THRESHOLD, ExactResolver, FuzzyResolver, Resolution,
};
pub use semantic::SemanticResolver;
pub use suggest::{RuleIndex, RuleSuggestion};
pub use utils::normalize_text;
