//! Column coverage and required values.

use std::collections::BTreeSet;

use kb_model::{RuleSet, Table, ValidationReport, Violation, ViolationKind};

/// Check the table's columns against the rule set's column partition.
///
/// Reports, in this order: columns declared both required and optional,
/// header names repeated in the table, table columns not declared, declared
/// columns missing from the table and rule columns that are not declared.
/// Only when none of those occur are the rows checked for empty required
/// cells.
pub fn validate_schema(table: &Table, rules: &RuleSet) -> ValidationReport {
    let mut report = ValidationReport::new();

    for column in rules.overlapping_columns() {
        report.add(Violation::column(column, ViolationKind::OverlappingColumn));
    }

    let declared = rules.declared_columns();
    let mut actual = BTreeSet::new();
    let mut repeated = BTreeSet::new();
    for header in &table.headers {
        if !actual.insert(header.as_str()) && repeated.insert(header.as_str()) {
            report.add(Violation::column(header, ViolationKind::DuplicateColumn));
        }
    }

    for header in &table.headers {
        if !declared.contains(header.as_str()) {
            report.add(Violation::column(header, ViolationKind::UnexpectedColumn));
        }
    }

    let mut reported = BTreeSet::new();
    for column in rules.required_columns.iter().chain(&rules.optional_columns) {
        if !actual.contains(column.as_str()) && reported.insert(column.as_str()) {
            report.add(Violation::column(column, ViolationKind::MissingColumn));
        }
    }

    let mut reported = BTreeSet::new();
    for (rule, column) in rules.referenced_columns() {
        if !declared.contains(column) && reported.insert((rule, column)) {
            report.add(Violation::column(
                column,
                ViolationKind::UndeclaredRuleColumn {
                    rule: rule.to_string(),
                },
            ));
        }
    }

    if report.is_empty() {
        report.extend(required_values(table, rules));
    }
    report
}

fn required_values(table: &Table, rules: &RuleSet) -> Vec<Violation> {
    let mut seen = BTreeSet::new();
    let required: Vec<(usize, &str)> = rules
        .required_columns
        .iter()
        .filter(|column| seen.insert(column.as_str()))
        .filter_map(|column| Some((table.column_index(column)?, column.as_str())))
        .collect();

    let mut violations = Vec::new();
    for (row_idx, cells) in table.rows.iter().enumerate() {
        for &(col_idx, column) in &required {
            if cells[col_idx].is_empty() {
                violations.push(Violation::cell(row_idx, column, ViolationKind::RequiredMissing));
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_cell_is_reported() {
        let table = Table::from_rows(["Name", "Target"], [["", "CD3"]]);
        let rules = RuleSet::with_columns(["Name", "Target"], Vec::<String>::new());
        let report = validate_schema(&table, &rules);
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].row_index(), Some(0));
        assert_eq!(report.violations[0].column.as_deref(), Some("Name"));
        assert_eq!(report.violations[0].reason(), "required value missing");
    }

    #[test]
    fn optional_cells_may_be_empty() {
        let table = Table::from_rows(["Name", "Notes"], [["a", ""]]);
        let rules = RuleSet::with_columns(["Name"], ["Notes"]);
        assert!(validate_schema(&table, &rules).is_valid());
    }

    #[test]
    fn column_mismatch_suppresses_row_checks() {
        let table = Table::from_rows(["Name", "Extra"], [["", "x"]]);
        let rules = RuleSet::with_columns(["Name", "Target"], Vec::<String>::new());
        let report = validate_schema(&table, &rules);
        let kinds: Vec<&ViolationKind> = report.iter().map(|v| &v.kind).collect();
        assert_eq!(
            kinds,
            vec![&ViolationKind::UnexpectedColumn, &ViolationKind::MissingColumn]
        );
        assert_eq!(report.violations[0].column.as_deref(), Some("Extra"));
        assert_eq!(report.violations[1].column.as_deref(), Some("Target"));
    }

    #[test]
    fn repeated_header_is_a_schema_violation() {
        let table = Table::from_rows(["Name", "Target", "Name"], [["IBEX", "CD3", ""]]);
        let rules = RuleSet::with_columns(["Name", "Target"], Vec::<String>::new());
        let report = validate_schema(&table, &rules);
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].kind, ViolationKind::DuplicateColumn);
        assert_eq!(report.violations[0].column.as_deref(), Some("Name"));
    }

    #[test]
    fn overlap_is_a_schema_violation() {
        let table = Table::from_rows(["Name"], [["a"]]);
        let rules = RuleSet::with_columns(["Name"], ["Name"]);
        let report = validate_schema(&table, &rules);
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].kind, ViolationKind::OverlappingColumn);
    }

    #[test]
    fn rule_columns_must_be_declared() {
        let table = Table::from_rows(["Name"], [["a"]]);
        let mut rules = RuleSet::with_columns(["Name"], Vec::<String>::new());
        rules.unique_columns.push("Id".to_string());
        let report = validate_schema(&table, &rules);
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.violations[0].kind,
            ViolationKind::UndeclaredRuleColumn {
                rule: "unique_columns".to_string()
            }
        );
    }
}
