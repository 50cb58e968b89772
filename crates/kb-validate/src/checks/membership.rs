//! Allowed-value checks for single- and multi-value columns.

use std::collections::HashSet;

use kb_model::{RuleSet, Table, ValidationReport, Violation, ViolationKind, split_multi};

/// Check enum and multi-enum columns.
///
/// Matching is exact and case-sensitive. Empty cells and empty parts of
/// multi-value cells are skipped.
pub fn validate_membership(table: &Table, rules: &RuleSet) -> ValidationReport {
    let mut report = ValidationReport::new();

    for (column, allowed) in &rules.enum_columns {
        check_column(table, column, allowed, false, &mut report);
    }
    for (column, allowed) in &rules.multi_enum_columns {
        check_column(table, column, allowed, true, &mut report);
    }

    report
}

fn check_column(
    table: &Table,
    column: &str,
    allowed: &[String],
    multi_value: bool,
    report: &mut ValidationReport,
) {
    let Some(values) = table.column_values(column) else {
        return;
    };
    let allowed_set: HashSet<&str> = allowed.iter().map(String::as_str).collect();

    for (row, cell) in values.into_iter().enumerate() {
        let parts: Vec<&str> = if multi_value {
            split_multi(cell).collect()
        } else if cell.is_empty() {
            Vec::new()
        } else {
            vec![cell]
        };
        for part in parts {
            if !allowed_set.contains(part) {
                report.add(Violation::cell(
                    row,
                    column,
                    ViolationKind::NotAllowed {
                        value: part.to_string(),
                        allowed: allowed.to_vec(),
                    },
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_outside_the_set_is_reported() {
        let table = Table::from_rows(["Recommend"], [["Yes"], ["no"], [""]]);
        let mut rules = RuleSet::with_columns(["Recommend"], Vec::<String>::new());
        rules.set_enum("Recommend", ["Yes", "No"]);
        let report = validate_membership(&table, &rules);
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].row_index(), Some(1));
    }

    #[test]
    fn multi_value_parts_are_trimmed_and_checked() {
        let table = Table::from_rows(["Agree"], [[" a ;b;; "], ["a; c"]]);
        let mut rules = RuleSet::with_columns(["Agree"], Vec::<String>::new());
        rules.set_multi_enum("Agree", ["a", "b"]);
        let report = validate_membership(&table, &rules);
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].row_index(), Some(1));
        assert!(matches!(
            &report.violations[0].kind,
            ViolationKind::NotAllowed { value, .. } if value == "c"
        ));
    }
}
