//! URL and DOI reachability.

use kb_model::{RuleSet, Table, ValidationReport, Violation, ViolationKind, split_multi};

use crate::link::{LinkCheckOptions, LinkChecker, LinkStatus, check_all};

/// One URL to check and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkTarget<'a> {
    row: usize,
    column_order: usize,
    position: usize,
    column: &'a str,
    url: String,
}

/// Check every URL and DOI cell of the table.
///
/// Multi-value cells are split on `;`; DOIs are checked through the
/// `https://doi.org/` resolver. Each (row, column, target) is checked once,
/// without caching. Violations are ordered by row, column declaration order
/// and position within the cell.
pub fn validate_links<C>(
    table: &Table,
    rules: &RuleSet,
    checker: &C,
    options: &LinkCheckOptions,
) -> ValidationReport
where
    C: LinkChecker + ?Sized,
{
    let targets = collect_targets(table, rules);
    if targets.is_empty() {
        return ValidationReport::new();
    }

    tracing::info!(links = targets.len(), workers = options.workers, "checking links");
    let urls: Vec<String> = targets.iter().map(|target| target.url.clone()).collect();
    let statuses = check_all(checker, &urls, options);

    let mut results: Vec<(LinkTarget<'_>, LinkStatus)> =
        targets.into_iter().zip(statuses).collect();
    results.sort_by_key(|(target, _)| (target.row, target.column_order, target.position));

    let mut report = ValidationReport::new();
    for (target, status) in results {
        if let Some(kind) = link_violation(&target.url, status) {
            report.add(Violation::cell(target.row, target.column, kind));
        }
    }
    report
}

/// Violation for a failed link check, `None` when the link is reachable.
pub fn link_violation(url: &str, status: LinkStatus) -> Option<ViolationKind> {
    match status {
        LinkStatus::Reachable => None,
        LinkStatus::NotFound { code } => Some(ViolationKind::LinkNotFound {
            url: url.to_string(),
            status: code,
        }),
        LinkStatus::Unreachable { reason } => Some(ViolationKind::LinkUnreachable {
            url: url.to_string(),
            reason,
        }),
    }
}

fn collect_targets<'a>(table: &Table, rules: &'a RuleSet) -> Vec<LinkTarget<'a>> {
    let columns: Vec<(usize, _, usize)> = rules
        .link_columns()
        .into_iter()
        .enumerate()
        .filter_map(|(order, link)| Some((order, link, table.column_index(link.column)?)))
        .collect();

    let mut targets = Vec::new();
    for (row, cells) in table.rows.iter().enumerate() {
        for (column_order, link, idx) in &columns {
            let cell = cells[*idx].as_str();
            let values: Vec<&str> = if link.multi_value {
                split_multi(cell).collect()
            } else if cell.is_empty() {
                Vec::new()
            } else {
                vec![cell]
            };
            for (position, value) in values.into_iter().enumerate() {
                targets.push(LinkTarget {
                    row,
                    column_order: *column_order,
                    position,
                    column: link.column,
                    url: link.target(value),
                });
            }
        }
    }
    targets
}
