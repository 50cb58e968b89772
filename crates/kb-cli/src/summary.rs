use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde_json::json;

use kb_model::{ValidationReport, ViolationCategory};

use crate::cli::ReportFormatArg;

const CATEGORIES: [ViolationCategory; 4] = [
    ViolationCategory::Schema,
    ViolationCategory::Cell,
    ViolationCategory::Link,
    ViolationCategory::Consistency,
];

/// Print the outcome of validating `input` to stdout.
pub fn print_report(input: &Path, report: &ValidationReport, format: ReportFormatArg) {
    match format {
        ReportFormatArg::Text => {
            for line in violation_lines(report) {
                println!("{line}");
            }
            println!("{}", summary_table(input, report));
            if report.is_valid() {
                println!("{}: valid", input.display());
            } else {
                println!("{}: {} violation(s)", input.display(), report.len());
            }
        }
        ReportFormatArg::Json => println!("{}", json_report(input, report)),
    }
}

/// One line per violation, in the order the checks produced them.
pub fn violation_lines(report: &ValidationReport) -> Vec<String> {
    report
        .iter()
        .map(|violation| format!("[{}] {violation}", violation.category().label()))
        .collect()
}

pub fn json_report(input: &Path, report: &ValidationReport) -> String {
    let value = json!({
        "input": input.display().to_string(),
        "valid": report.is_valid(),
        "violations": report.violations,
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

/// Violation counts per category for one input.
pub fn summary_table(input: &Path, report: &ValidationReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Category"),
        header_cell("Violations"),
        header_cell("Rows"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    let name = input.display().to_string();
    for category in CATEGORIES {
        table.add_row(vec![
            Cell::new(&name),
            Cell::new(category.label()),
            count_cell(report.count(category), category_color(category)),
            dim_cell(affected_rows(report, Some(category))),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(report.len(), Color::Red).add_attribute(Attribute::Bold),
        dim_cell(affected_rows(report, None)),
    ]);
    table
}

/// Distinct table rows with at least one violation, optionally of one category.
pub fn affected_rows(report: &ValidationReport, category: Option<ViolationCategory>) -> usize {
    report
        .iter()
        .filter(|violation| category.is_none_or(|category| violation.category() == category))
        .filter_map(|violation| violation.row_index())
        .collect::<BTreeSet<_>>()
        .len()
}

/// List files written by a generator.
pub fn print_generated(paths: &[PathBuf]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Generated")]);
    apply_summary_table_style(&mut table);
    for path in paths {
        table.add_row(vec![Cell::new(path.display()).fg(Color::Green)]);
    }
    println!("{table}");
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn category_color(category: ViolationCategory) -> Color {
    match category {
        ViolationCategory::Schema => Color::Red,
        ViolationCategory::Cell => Color::Yellow,
        ViolationCategory::Link => Color::Magenta,
        ViolationCategory::Consistency => Color::Yellow,
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
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
