//! The generic validation pipeline.

use kb_model::{RuleSet, Table, ValidationReport};

use crate::checks::{validate_links, validate_membership, validate_schema, validate_uniqueness};
use crate::link::{LinkCheckOptions, LinkChecker};

/// Validate a table against a rule set.
///
/// Schema violations end validation. Otherwise uniqueness, membership and
/// (when a checker is given) link violations follow, in that order.
pub fn validate_table(
    table: &Table,
    rules: &RuleSet,
    checker: Option<&dyn LinkChecker>,
    options: &LinkCheckOptions,
) -> ValidationReport {
    let span = tracing::info_span!(
        "validate_table",
        rows = table.len(),
        columns = table.headers.len()
    );
    let _guard = span.enter();

    let mut report = validate_schema(table, rules);
    if !report.is_empty() {
        tracing::info!(violations = report.len(), "schema check failed, skipping row checks");
        return report;
    }

    report.merge(validate_uniqueness(table, rules));
    report.merge(validate_membership(table, rules));
    match checker {
        Some(checker) => report.merge(validate_links(table, rules, checker, options)),
        None if rules.has_link_columns() => tracing::info!("link checks skipped"),
        None => {}
    }

    tracing::info!(violations = report.len(), "validation finished");
    report
}
