use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fieldcheck_cli::pipeline::InputOutcome;
use fieldcheck_map::RuleSuggestion;
use fieldcheck_model::{RuleTable, VerdictCounts};
use fieldcheck_rules::Interpretation;

use crate::types::{RulesResult, ValidateResult};

pub fn print_validate_summary(result: &ValidateResult, max_failures: usize) {
    println!("Rules: {} ({} applicable)", result.rules.len(), result.rules.applicable_count());
    for outcome in &result.inputs {
        print_input_summary(outcome, max_failures);
    }
    if result.inputs.iter().any(|outcome| outcome.outputs.is_some()) {
        println!("Output: {}", result.output_dir.display());
    }
    if !result.errors.is_empty() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

fn print_input_summary(outcome: &InputOutcome, max_failures: usize) {
    let run = &outcome.run;
    println!();
    println!("Input: {} ({} rows)", outcome.input.display(), run.rows());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Match"),
        header_cell("Pattern"),
        header_cell("Pass"),
        header_cell("Fail"),
        header_cell("Not Found"),
        header_cell("Not Applied"),
        header_cell("Invalid"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 4..=8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for summary in &run.summaries {
        let counts = summary.counts;
        let mut row = vec![
            Cell::new(&summary.field)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            optional_cell(summary.column.as_deref()),
            optional_cell(summary.strategy.map(|strategy| strategy.to_string()).as_deref()),
            optional_cell(summary.pattern.as_deref()),
        ];
        row.extend(count_cells(counts));
        table.add_row(row);
    }
    let totals = run.totals();
    let mut total_row = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ];
    total_row.extend(
        count_cells(totals)
            .into_iter()
            .map(|cell| cell.add_attribute(Attribute::Bold)),
    );
    table.add_row(total_row);
    println!("{table}");

    if let Some(paths) = &outcome.outputs {
        println!("Annotated: {}", paths.annotated.display());
        println!("Failures: {}", paths.failures.display());
        println!("Report: {}", paths.report.display());
    }
    if !run.diagnostics.is_empty() {
        println!("Invalid patterns:");
        for diagnostic in &run.diagnostics {
            println!("- {}: {} ({})", diagnostic.field, diagnostic.pattern, diagnostic.error);
        }
    }
    print_failure_table(outcome, max_failures);
}

fn print_failure_table(outcome: &InputOutcome, max_failures: usize) {
    let ledger = &outcome.run.ledger;
    if ledger.is_empty() || max_failures == 0 {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Value"),
        header_cell("Pattern"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for entry in ledger.entries().iter().take(max_failures) {
        table.add_row(vec![
            Cell::new(entry.row),
            Cell::new(&entry.field),
            Cell::new(&entry.column),
            match entry.value.as_deref() {
                Some(value) => Cell::new(value).fg(Color::Red),
                None => dim_cell("(missing)"),
            },
            dim_cell(&entry.pattern),
        ]);
    }
    println!("Failures:");
    println!("{table}");
    if ledger.len() > max_failures {
        println!("... {} more in the failure ledger", ledger.len() - max_failures);
    }
}

pub fn print_rules(result: &RulesResult) {
    print_rule_table(&result.rules);
    if let Some(path) = &result.exported {
        println!("Exported: {}", path.display());
    }
}

fn print_rule_table(rules: &RuleTable) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Rule"),
        header_cell("Pattern"),
        header_cell("Category"),
    ]);
    apply_table_style(&mut table);
    for rule in rules {
        table.add_row(vec![
            Cell::new(&rule.field_name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&rule.original_text),
            optional_cell(rule.pattern.as_deref()),
            Cell::new(rule.category.label()),
        ]);
    }
    println!("{table}");
    println!("{} rules, {} applicable", rules.len(), rules.applicable_count());
}

pub fn print_interpretation(text: &str, interpretation: &Interpretation) {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.add_row(vec![header_cell("Rule"), Cell::new(text)]);
    table.add_row(vec![
        header_cell("Pattern"),
        optional_cell(interpretation.pattern.as_deref()),
    ]);
    table.add_row(vec![
        header_cell("Category"),
        Cell::new(interpretation.category.label()),
    ]);
    table.add_row(vec![header_cell("Matcher"), optional_cell(interpretation.matcher)]);
    println!("{table}");
}

pub fn print_suggestions(suggestions: &[RuleSuggestion]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Suggested Rule"),
        header_cell("Distance"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for suggestion in suggestions {
        table.add_row(vec![
            Cell::new(&suggestion.column)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            optional_cell(suggestion.rule.as_deref()),
            match suggestion.distance {
                Some(distance) => Cell::new(format!("{distance:.4}")),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{table}");
}

fn count_cells(counts: VerdictCounts) -> Vec<Cell> {
    vec![
        count_cell(counts.pass, Color::Green),
        count_cell(counts.fail, Color::Red),
        count_cell(counts.column_not_found, Color::Yellow),
        count_cell(counts.rule_not_applied, Color::DarkGrey),
        count_cell(counts.invalid_pattern, Color::Magenta),
    ]
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
