//! Fluorescent probe table: the probe column must exist and hold unique names.

use kb_model::{RuleSet, Table, ValidationReport, Violation, ViolationKind};

use crate::checks::validate_uniqueness;

pub const PROBE_COLUMN: &str = "Fluorescent Probe";

/// Validate `fluorescent_probes.csv`: the probe column exists and its values
/// are unique.
pub fn validate_probes(table: &Table) -> ValidationReport {
    if !table.has_column(PROBE_COLUMN) {
        return ValidationReport::from(vec![Violation::column(
            PROBE_COLUMN,
            ViolationKind::MissingColumn,
        )]);
    }
    let mut rules = RuleSet::with_columns([PROBE_COLUMN], Vec::<String>::new());
    rules.unique_columns.push(PROBE_COLUMN.to_string());
    validate_uniqueness(table, &rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_probes_are_reported() {
        let table = Table::from_rows(
            [PROBE_COLUMN, "Excitation Max (nm)"],
            [["AF488", "495"], ["BV421", "405"], ["AF488", "499"]],
        );
        let report = validate_probes(&table);
        let rows: Vec<usize> = report.iter().filter_map(Violation::row_index).collect();
        assert_eq!(rows, vec![0, 2]);
    }

    #[test]
    fn missing_probe_column() {
        let table = Table::from_rows(["Probe"], [["AF488"]]);
        let report = validate_probes(&table);
        assert_eq!(report.violations[0].kind, ViolationKind::MissingColumn);
    }
}
