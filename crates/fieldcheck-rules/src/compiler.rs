//! Rule Compiler
//!
//! Turns a rulebook into a [`RuleTable`] with exactly one rule per field.

use std::collections::HashMap;

use tracing::{debug, info};

use fieldcheck_model::{CompiledRule, RuleDescription, RuleTable};

use crate::interpreter::interpret;

/// Canonical form of a rulebook field name.
///
/// Extracted tables often wrap long names over several lines, so line breaks
/// and whitespace runs collapse to a single space.
pub fn normalize_field_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compile every rule description.
///
/// Records with a blank field name are skipped. When a field appears more
/// than once the last description wins, placed where the field first
/// appeared.
pub fn compile(descriptions: &[RuleDescription]) -> RuleTable {
    let mut rules: Vec<CompiledRule> = Vec::with_capacity(descriptions.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, description) in descriptions.iter().enumerate() {
        let field_name = normalize_field_name(&description.field_name);
        if field_name.is_empty() {
            debug!(record = index + 1, "skipping rule without a field name");
            continue;
        }

        let rule_text = description.rule_text();
        let interpretation = interpret(rule_text);
        debug!(
            field = %field_name,
            category = %interpretation.category,
            matcher = interpretation.matcher.unwrap_or("none"),
            "interpreted rule"
        );

        let rule = CompiledRule {
            field_name: field_name.clone(),
            original_text: rule_text.to_string(),
            pattern: interpretation.pattern,
            category: interpretation.category,
        };

        match positions.get(&field_name) {
            Some(&position) => {
                debug!(field = %field_name, "duplicate field; later rule replaces earlier one");
                rules[position] = rule;
            }
            None => {
                positions.insert(field_name, rules.len());
                rules.push(rule);
            }
        }
    }

    let table = RuleTable::new(rules);
    info!(
        records = descriptions.len(),
        rules = table.len(),
        applicable = table.applicable_count(),
        "compiled rule table"
    );
    table
}
