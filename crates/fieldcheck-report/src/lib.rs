//! Output generation for validation runs.
//!
//! - **Annotated table**: the input plus one verdict column per rule
//! - **Failure ledger**: one CSV row per failing value
//! - **Run report**: JSON with bindings, per-rule counts, failures and
//!   invalid patterns
//! - **Rule table export**: compiled rules as an editable CSV
//! - **Pattern diagnostics**: append-only CSV of patterns that did not compile

mod diagnostics;
mod run_report;
mod tables;

pub use diagnostics::{DIAGNOSTIC_HEADERS, append_pattern_diagnostics};
pub use run_report::{OutputPaths, run_report_json, write_run_outputs, write_run_report_json};
pub use tables::{
    LEDGER_HEADERS, write_annotated_csv, write_frame_csv, write_ledger_csv, write_rule_table_csv,
};
