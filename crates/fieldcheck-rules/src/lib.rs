//! Rule interpretation and compilation.
//!
//! [`interpret`] converts one free-text rule into a regular expression and a
//! [`RuleCategory`](fieldcheck_model::RuleCategory) using an ordered list of
//! keyword signatures. [`compile`] applies it to a whole rulebook and
//! produces the [`RuleTable`](fieldcheck_model::RuleTable) that validation
//! runs share.

#![deny(unsafe_code)]

pub mod compiler;
pub mod forbidden;
pub mod interpreter;

pub use compiler::{compile, normalize_field_name};
pub use forbidden::{ForbiddenSet, forbidden_pattern};
pub use interpreter::{Interpretation, interpret, matcher_names};
