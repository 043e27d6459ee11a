//! Rule compiler tests.

use fieldcheck_model::{RuleCategory, RuleDescription, RuleTable};
use fieldcheck_rules::compile;

fn rulebook() -> Vec<RuleDescription> {
    vec![
        RuleDescription::new("Customer ID", "Identifier", "Alphanumeric"),
        RuleDescription::new("Zip", "Billing postal code", "5 digit zip code"),
        RuleDescription::new("Amount", "Must be numeric", ""),
        RuleDescription::new("Customer\r\nID", "Identifier", "Must not contain a comma"),
        RuleDescription::new("Notes", "Free text", "Any value"),
    ]
}

fn listing(table: &RuleTable) -> String {
    table
        .iter()
        .map(|rule| {
            format!(
                "{} | {} | {}",
                rule.field_name,
                rule.category,
                rule.pattern.as_deref().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn compile_is_deterministic() {
    let descriptions = rulebook();
    assert_eq!(compile(&descriptions), compile(&descriptions));
}

#[test]
fn last_duplicate_wins() {
    let table = compile(&rulebook());
    assert_eq!(table.len(), 4);

    let rule = table.get("Customer ID").expect("customer id rule");
    assert_eq!(rule.category, RuleCategory::ForbiddenCharacters);
    assert_eq!(rule.original_text, "Must not contain a comma");
    assert_eq!(rule.pattern.as_deref(), Some("^[^,]*$"));
}

#[test]
fn rule_table_listing() {
    let table = compile(&rulebook());
    insta::assert_snapshot!(listing(&table), @r"
    Customer ID | Forbidden characters | ^[^,]*$
    Zip | US ZIP code | ^\d{5}$
    Amount | Numeric amount | ^\d+(?:\.\d{1,2})?$
    Notes | Not applicable | -
    ");
}

#[test]
fn description_is_used_when_allowable_values_are_blank() {
    let table = compile(&rulebook());
    let amount = table.get("Amount").expect("amount rule");
    assert_eq!(amount.original_text, "Must be numeric");
    assert_eq!(amount.category, RuleCategory::NumericAmount);
}
