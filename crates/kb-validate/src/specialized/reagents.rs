//! `reagent_resources.csv` validation.
//!
//! Steps, each run only when the previous ones pass:
//! 1. generic rules, with contributor, vendor and agree/disagree columns
//!    restricted to known ORCIDs and vendors;
//! 2. row-level consistency (duplicate rows, contributor listed, ORCID
//!    limits, no ORCID both agreeing and disagreeing);
//! 3. supporting-material pages match the table, and no extra pages exist.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use kb_ingest::{list_files_with_extension, read_text};
use kb_model::{
    NOT_APPLICABLE, RowView, RuleSet, Table, ValidationReport, Violation, ViolationKind,
    split_multi, supporting_dir_name,
};

use super::supporting::{extract_orcids, parse_configurations};
use crate::checks::duplicate_groups;
use crate::link::{LinkCheckOptions, LinkChecker};
use crate::pipeline::validate_table;

/// Upper bound on ORCIDs in the Agree or Disagree column of one row.
pub const MAX_ORCID_ENTRIES: usize = 5;

pub const TARGET_COLUMN: &str = "Target Name / Protein Biomarker";
pub const CONJUGATE_COLUMN: &str = "Conjugate";
pub const CONTRIBUTOR_COLUMN: &str = "Contributor";
pub const AGREE_COLUMN: &str = "Agree";
pub const DISAGREE_COLUMN: &str = "Disagree";
pub const VENDOR_COLUMN: &str = "Vendor";
/// Page-only column, absent from the table.
const NOTES_COLUMN: &str = "Notes";

/// Cross-file inputs for reagent validation.
#[derive(Debug, Clone, Copy)]
pub struct ReagentContext<'a> {
    /// Creator ORCIDs from `.zenodo.json`.
    pub creator_orcids: &'a [String],
    /// Known vendor names.
    pub vendors: &'a [String],
    /// Root of the supporting-material pages.
    pub supporting_root: &'a Path,
}

/// Validate the reagent resources table.
///
/// Returns an error only when a supporting-material file exists but cannot
/// be read.
pub fn validate_reagents(
    table: &Table,
    rules: &RuleSet,
    context: &ReagentContext<'_>,
    checker: Option<&dyn LinkChecker>,
    options: &LinkCheckOptions,
) -> kb_ingest::Result<ValidationReport> {
    let mut known: Vec<String> = context.creator_orcids.to_vec();
    known.push(NOT_APPLICABLE.to_string());

    let mut rules = rules.clone();
    rules.set_enum(CONTRIBUTOR_COLUMN, known.iter().cloned());
    rules.set_enum(VENDOR_COLUMN, context.vendors.iter().cloned());
    rules.set_multi_enum(AGREE_COLUMN, known.iter().cloned());
    rules.set_multi_enum(DISAGREE_COLUMN, known);

    let report = validate_table(table, &rules, checker, options);
    if !report.is_empty() {
        return Ok(report);
    }

    let report = validate_rows(table);
    if !report.is_empty() {
        return Ok(report);
    }

    validate_supporting_material(table, context.supporting_root)
}

/// ORCIDs of a multi-value cell, without `NA`.
fn orcids(cell: &str) -> Vec<&str> {
    split_multi(cell)
        .filter(|value| *value != NOT_APPLICABLE)
        .collect()
}

fn validate_rows(table: &Table) -> ValidationReport {
    let mut report = ValidationReport::new();

    let compared: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, header)| {
            ![CONTRIBUTOR_COLUMN, AGREE_COLUMN, DISAGREE_COLUMN].contains(&header.as_str())
        })
        .map(|(idx, _)| idx)
        .collect();
    let keys = table
        .rows
        .iter()
        .map(|cells| Some(compared.iter().map(|&idx| cells[idx].as_str()).collect::<Vec<_>>()));
    for (_, rows) in duplicate_groups(keys) {
        for &row in &rows {
            report.add(Violation::row(row, ViolationKind::DuplicateRow { rows: rows.clone() }));
        }
    }

    for (idx, row) in table.iter_rows().enumerate() {
        let agree = orcids(row.get(AGREE_COLUMN));
        let disagree = orcids(row.get(DISAGREE_COLUMN));
        let contributor = row.get(CONTRIBUTOR_COLUMN);

        if !agree.contains(&contributor) && !disagree.contains(&contributor) {
            report.add(Violation::cell(
                idx,
                CONTRIBUTOR_COLUMN,
                ViolationKind::ContributorNotListed {
                    contributor: contributor.to_string(),
                },
            ));
        }

        for (column, listed) in [(AGREE_COLUMN, &agree), (DISAGREE_COLUMN, &disagree)] {
            if listed.len() > MAX_ORCID_ENTRIES {
                report.add(Violation::cell(
                    idx,
                    column,
                    ViolationKind::TooManyOrcids {
                        count: listed.len(),
                        max: MAX_ORCID_ENTRIES,
                    },
                ));
            }
        }

        let mut reported = BTreeSet::new();
        for orcid in agree.iter().filter(|orcid| disagree.contains(*orcid)) {
            if reported.insert(*orcid) {
                report.add(Violation::row(
                    idx,
                    ViolationKind::OrcidInBoth {
                        orcid: (*orcid).to_string(),
                    },
                ));
            }
        }
    }

    report
}

/// Normalized configuration cell; ORCID lists compare as sets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Cell {
    Text(String),
    Orcids(BTreeSet<String>),
}

type Configuration = BTreeMap<String, Cell>;

fn table_configuration(row: RowView<'_>, headers: &[String]) -> Configuration {
    headers
        .iter()
        .map(|header| {
            let value = row.get(header);
            let cell = if header == AGREE_COLUMN || header == DISAGREE_COLUMN {
                Cell::Orcids(orcids(value).into_iter().map(str::to_string).collect())
            } else {
                Cell::Text(value.to_string())
            };
            (header.clone(), cell)
        })
        .collect()
}

fn page_configuration(row: RowView<'_>, headers: &[String]) -> Configuration {
    headers
        .iter()
        .filter(|header| header.as_str() != NOTES_COLUMN)
        .map(|header| {
            let value = row.get(header);
            let cell = match header.as_str() {
                AGREE_COLUMN | DISAGREE_COLUMN => {
                    Cell::Orcids(extract_orcids(value).into_iter().map(str::to_string).collect())
                }
                CONTRIBUTOR_COLUMN => Cell::Text(
                    extract_orcids(value)
                        .first()
                        .map_or_else(|| value.to_string(), |orcid| (*orcid).to_string()),
                ),
                _ => Cell::Text(value.to_string()),
            };
            (header.clone(), cell)
        })
        .collect()
}

/// Compare a page's configurations with the table rows it should list.
fn compare_configurations(table: &Table, rows: &[usize], page: &Table) -> Option<String> {
    let page_columns: BTreeSet<&str> = page
        .headers
        .iter()
        .map(String::as_str)
        .filter(|header| *header != NOTES_COLUMN)
        .collect();
    let table_columns: BTreeSet<&str> = table.headers.iter().map(String::as_str).collect();
    if page_columns != table_columns {
        let extra: Vec<&str> = page_columns.difference(&table_columns).copied().collect();
        let missing: Vec<&str> = table_columns.difference(&page_columns).copied().collect();
        return Some(format!(
            "columns differ (extra: [{}], missing: [{}])",
            extra.join(", "),
            missing.join(", ")
        ));
    }

    if page.len() != rows.len() {
        return Some(format!(
            "{} configurations listed, {} expected",
            page.len(),
            rows.len()
        ));
    }

    let mut expected: Vec<Configuration> = rows
        .iter()
        .filter_map(|&idx| table.row(idx))
        .map(|row| table_configuration(row, &table.headers))
        .collect();
    let mut actual: Vec<Configuration> = page
        .iter_rows()
        .map(|row| page_configuration(row, &page.headers))
        .collect();
    expected.sort();
    actual.sort();
    (expected != actual).then(|| "configurations differ".to_string())
}

fn validate_supporting_material(table: &Table, root: &Path) -> kb_ingest::Result<ValidationReport> {
    let span = tracing::info_span!("supporting_material", root = %root.display());
    let _guard = span.enter();

    let mut report = ValidationReport::new();
    let mut expected_files: BTreeSet<PathBuf> = BTreeSet::new();

    let mut pairs: Vec<(&str, &str)> = Vec::new();
    for row in table.iter_rows() {
        let pair = (row.get(TARGET_COLUMN), row.get(CONJUGATE_COLUMN));
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }

    for (target, conjugate) in pairs {
        let pair_rows: Vec<usize> = table
            .iter_rows()
            .enumerate()
            .filter(|(_, row)| {
                row.get(TARGET_COLUMN) == target && row.get(CONJUGATE_COLUMN) == conjugate
            })
            .map(|(idx, _)| idx)
            .collect();
        let pair_orcids: BTreeSet<&str> = pair_rows
            .iter()
            .filter_map(|&idx| table.row(idx))
            .flat_map(|row| {
                orcids(row.get(AGREE_COLUMN))
                    .into_iter()
                    .chain(orcids(row.get(DISAGREE_COLUMN)))
            })
            .collect();

        let dir = root.join(supporting_dir_name(target, conjugate));
        for orcid in pair_orcids {
            let path = dir.join(format!("{orcid}.md"));
            expected_files.insert(path.clone());
            if !path.is_file() {
                report.add(Violation::keyed(orcid, ViolationKind::MissingFile { path }));
                continue;
            }

            let text = read_text(&path)?;
            let page = match parse_configurations(&text) {
                Ok(page) => page,
                Err(detail) => {
                    report.add(Violation::keyed(
                        path.display().to_string(),
                        ViolationKind::MalformedRecord { detail },
                    ));
                    continue;
                }
            };

            let orcid_rows: Vec<usize> = pair_rows
                .iter()
                .copied()
                .filter(|&idx| {
                    table.row(idx).is_some_and(|row| {
                        orcids(row.get(AGREE_COLUMN)).contains(&orcid)
                            || orcids(row.get(DISAGREE_COLUMN)).contains(&orcid)
                    })
                })
                .collect();
            if let Some(detail) = compare_configurations(table, &orcid_rows, &page) {
                report.add(Violation::keyed(
                    orcid,
                    ViolationKind::ContentMismatch { path, detail },
                ));
            }
        }
    }

    if root.is_dir() {
        for path in list_files_with_extension(root, "md")? {
            if !expected_files.contains(&path) {
                report.add(Violation::keyed(
                    path.display().to_string(),
                    ViolationKind::SuperfluousFile { path },
                ));
            }
        }
    } else {
        tracing::warn!("supporting material directory does not exist");
    }

    tracing::info!(
        pages = expected_files.len(),
        violations = report.len(),
        "supporting material checked"
    );
    Ok(report)
}
