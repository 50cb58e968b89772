//! Duplicate detection across rows and inside multi-value cells.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use kb_model::{RuleSet, Table, ValidationReport, Violation, ViolationKind, split_multi};

/// Report duplicated values in unique columns and repeated values inside
/// the cells of `unique_within_cell_columns`.
///
/// Every row holding a duplicated value is reported, grouped by value in the
/// order values are first seen. Empty cells never count as duplicates.
pub fn validate_uniqueness(table: &Table, rules: &RuleSet) -> ValidationReport {
    let mut report = ValidationReport::new();

    let mut seen_columns = BTreeSet::new();
    for column in &rules.unique_columns {
        if !seen_columns.insert(column.as_str()) {
            continue;
        }
        let Some(values) = table.column_values(column) else {
            continue;
        };
        let keys = values.iter().map(|value| (!value.is_empty()).then_some(*value));
        for (value, rows) in duplicate_groups(keys) {
            for &row in &rows {
                report.add(Violation::cell(
                    row,
                    column,
                    ViolationKind::DuplicateValue {
                        value: value.to_string(),
                        rows: rows.clone(),
                    },
                ));
            }
        }
    }

    let mut seen_columns = BTreeSet::new();
    for column in &rules.unique_within_cell_columns {
        if !seen_columns.insert(column.as_str()) {
            continue;
        }
        let Some(values) = table.column_values(column) else {
            continue;
        };
        for (row, cell) in values.iter().enumerate() {
            for value in repeated_in_cell(cell) {
                report.add(Violation::cell(
                    row,
                    column,
                    ViolationKind::DuplicateInCell {
                        value: value.to_string(),
                    },
                ));
            }
        }
    }

    report
}

/// Keys occurring at more than one position, with all their positions, in
/// first-seen order. `None` keys are skipped.
pub fn duplicate_groups<K, I>(keys: I) -> Vec<(K, Vec<usize>)>
where
    I: IntoIterator<Item = Option<K>>,
    K: Eq + Hash + Clone,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<usize>)> = Vec::new();
    for (row, key) in keys.into_iter().enumerate() {
        let Some(key) = key else {
            continue;
        };
        match index.get(&key) {
            Some(&group) => groups[group].1.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![row]));
            }
        }
    }
    groups.retain(|(_, rows)| rows.len() > 1);
    groups
}

/// Values appearing more than once in a `;`-separated cell, each reported once.
fn repeated_in_cell(cell: &str) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    let mut repeated = Vec::new();
    for part in split_multi(cell) {
        if !seen.insert(part) && reported.insert(part) {
            repeated.push(part);
        }
    }
    repeated
}
