//! Rulebook and input table loading.

pub mod error;
pub mod polars_utils;
pub mod rulebook;
pub mod table;

pub use error::{IngestError, Result};
pub use polars_utils::{any_to_optional_string, any_to_string, cell_value, column_names};
pub use rulebook::{
    RULE_TABLE_HEADERS, RecordRange, RulebookFormat, load_rule_sentences, load_rule_table,
    load_rulebook, parse_rulebook_csv, parse_rulebook_json, parse_rulebook_text, rule_sentences,
};
pub use table::read_input_table;
