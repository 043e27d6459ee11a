//! End-to-end validation runs.

use polars::prelude::{Column, DataFrame};

use fieldcheck_ingest::cell_value;
use fieldcheck_map::ColumnBinder;
use fieldcheck_model::{
    BindingStrategy, CompiledRule, RuleCategory, RuleDescription, RuleTable, Verdict,
};
use fieldcheck_rules::compile;
use fieldcheck_validate::execute;

fn labels(df: &DataFrame, column: &str) -> Vec<String> {
    let column = df.column(column).expect("verdict column");
    (0..df.height())
        .map(|idx| cell_value(column, idx).unwrap_or_default())
        .collect()
}

#[test]
fn zip_scenario() {
    let table = compile(&[RuleDescription::new("Zip", "", "5 digit zip code")]);
    let df = DataFrame::new(vec![Column::new(
        "Zip".into(),
        vec![Some("12345"), Some("1234"), None],
    )])
    .expect("df");

    let run = execute(&table, &df, &ColumnBinder::default()).expect("run");

    assert_eq!(labels(&run.annotated, "Zip_validation"), vec!["Pass", "Fail", "Fail"]);
    let rows: Vec<usize> = run.ledger.entries().iter().map(|entry| entry.row).collect();
    assert_eq!(rows, vec![2, 3]);
    assert_eq!(run.ledger.entries()[0].value.as_deref(), Some("1234"));
    assert_eq!(run.ledger.entries()[1].value, None);
    assert_eq!(run.ledger.entries()[1].pattern, r"^\d{5}$");
    assert!(run.has_failures());
}

#[test]
fn fuzzy_binding_records_the_input_column() {
    let table = compile(&[RuleDescription::new("ZIP Code", "", "5 digit zip code")]);
    let df = DataFrame::new(vec![
        Column::new("zip_code".into(), ["02139", "ABCDE"]),
        Column::new("city".into(), ["Cambridge", "Boston"]),
    ])
    .expect("df");

    let run = execute(&table, &df, &ColumnBinder::default()).expect("run");

    assert_eq!(run.bindings[0].column.as_deref(), Some("zip_code"));
    assert_eq!(run.bindings[0].strategy, Some(BindingStrategy::Fuzzy));
    assert_eq!(run.ledger.entries()[0].column, "zip_code");
    assert_eq!(run.ledger.entries()[0].field, "ZIP Code");
    assert_eq!(labels(&run.annotated, "ZIP Code_validation"), vec!["Pass", "Fail"]);
}

#[test]
fn unbound_and_inapplicable_rules_do_not_reach_the_ledger() {
    let table = compile(&[
        RuleDescription::new("Country", "", "2 letter country code"),
        RuleDescription::new("Notes", "", "Free text"),
    ]);
    let df = DataFrame::new(vec![Column::new("Notes".into(), ["a", "b"])]).expect("df");

    let run = execute(&table, &df, &ColumnBinder::default()).expect("run");

    assert_eq!(
        labels(&run.annotated, "Country_validation"),
        vec!["Column Not Found", "Column Not Found"]
    );
    assert_eq!(
        labels(&run.annotated, "Notes_validation"),
        vec!["Rule Not Applied", "Rule Not Applied"]
    );
    assert!(run.ledger.is_empty());
    assert!(!run.has_failures());
    assert_eq!(run.summaries[0].counts.column_not_found, 2);
    assert_eq!(run.summaries[1].counts.rule_not_applied, 2);
}

#[test]
fn invalid_pattern_is_isolated_and_diagnosed() {
    let table = RuleTable::new(vec![
        CompiledRule {
            field_name: "Code".to_string(),
            original_text: "edited by hand".to_string(),
            pattern: Some("^(unclosed$".to_string()),
            category: RuleCategory::Custom,
        },
        CompiledRule {
            field_name: "Amount".to_string(),
            original_text: "amount".to_string(),
            pattern: Some(r"^\d+(?:\.\d{1,2})?$".to_string()),
            category: RuleCategory::NumericAmount,
        },
    ]);
    let df = DataFrame::new(vec![
        Column::new("Code".into(), ["X1"]),
        Column::new("Amount".into(), ["10.5"]),
    ])
    .expect("df");

    let run = execute(&table, &df, &ColumnBinder::default()).expect("run");

    assert_eq!(labels(&run.annotated, "Code_validation"), vec![Verdict::InvalidPattern.label()]);
    assert_eq!(labels(&run.annotated, "Amount_validation"), vec!["Pass"]);
    assert_eq!(run.diagnostics.len(), 1);
    assert_eq!(run.diagnostics[0].field, "Code");
    assert_eq!(run.diagnostics[0].pattern, "^(unclosed$");
    assert!(run.ledger.is_empty());
}

#[test]
fn reusing_a_table_across_inputs() {
    let table = compile(&[RuleDescription::new("Amount", "", "Amount can be negative")]);
    let binder = ColumnBinder::default();

    let first = DataFrame::new(vec![Column::new("Amount".into(), ["-1.25"])]).expect("df");
    let second = DataFrame::new(vec![Column::new("amount".into(), ["1.234", "7"])]).expect("df");

    let run_a = execute(&table, &first, &binder).expect("run");
    let run_b = execute(&table, &second, &binder).expect("run");

    assert!(!run_a.has_failures());
    assert_eq!(run_b.ledger.len(), 1);
    assert_eq!(run_b.totals().pass, 1);
    assert_eq!(run_b.rows(), 2);
}
