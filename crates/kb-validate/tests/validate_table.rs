//! Integration tests for the generic table validator.

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use kb_ingest::{IngestError, load_rule_set, read_table};
use kb_model::{RuleSet, Table, ViolationCategory, ViolationKind};
use kb_validate::{LinkCheckOptions, LinkStatus, validate_membership, validate_table};
use proptest::prelude::*;
use tempfile::NamedTempFile;

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn quick_options() -> LinkCheckOptions {
    LinkCheckOptions {
        workers: 2,
        backoff: Duration::ZERO,
        ..LinkCheckOptions::default()
    }
}

#[test]
fn test_required_value_missing_from_files() {
    let csv = temp_file("Name,Target\n,CD3\n");
    let rules = temp_file(r#"{"required_columns": ["Name", "Target"]}"#);

    let table = read_table(csv.path()).unwrap();
    let rules = load_rule_set(rules.path()).unwrap();
    let report = validate_table(&table, &rules, None, &LinkCheckOptions::default());

    assert_eq!(report.len(), 1);
    let violation = &report.violations[0];
    assert_eq!(violation.row_index(), Some(0));
    assert_eq!(violation.column.as_deref(), Some("Name"));
    assert_eq!(violation.reason(), "required value missing");
}

#[test]
fn test_repeated_header_is_never_accepted() {
    let csv = temp_file("Name,Target,Name\nIBEX,CD3,\n");
    let err = read_table(csv.path()).unwrap_err();
    assert!(matches!(err, IngestError::DuplicateColumn { ref column, .. } if column == "Name"));

    let table = Table::from_rows(["Name", "Target", "Name"], [["IBEX", "CD3", ""]]);
    let rules = RuleSet::with_columns(["Name", "Target"], Vec::<String>::new());
    let report = validate_table(&table, &rules, None, &LinkCheckOptions::default());
    assert!(!report.is_valid());
    assert_eq!(report.violations[0].kind, ViolationKind::DuplicateColumn);
}

#[test]
fn test_windows_1252_required_value_behind_bom() {
    let mut csv = NamedTempFile::new().unwrap();
    csv.write_all(b"\xEF\xBB\xBFTerm,Definition\nNa\xEFve,\n").unwrap();
    let rules = temp_file(r#"{"required_columns": ["Term", "Definition"]}"#);

    let table = read_table(csv.path()).unwrap();
    assert_eq!(table.headers, vec!["Term", "Definition"]);
    assert_eq!(table.value(0, "Term"), Some("Na\u{ef}ve"));

    let rules = load_rule_set(rules.path()).unwrap();
    let report = validate_table(&table, &rules, None, &LinkCheckOptions::default());
    assert_eq!(report.len(), 1);
    assert_eq!(report.violations[0].column.as_deref(), Some("Definition"));
    assert_eq!(report.violations[0].kind, ViolationKind::RequiredMissing);
}

#[test]
fn test_schema_violation_stops_row_checks() {
    let table = Table::from_rows(["Probe", "Extra"], [["AF488", "x"], ["AF488", "y"]]);
    let mut rules = RuleSet::with_columns(["Probe"], Vec::<String>::new());
    rules.unique_columns.push("Probe".to_string());

    let report = validate_table(&table, &rules, None, &LinkCheckOptions::default());
    assert_eq!(report.len(), 1);
    assert_eq!(report.count(ViolationCategory::Schema), 1);
}

#[test]
fn test_duplicates_report_every_row() {
    let table = Table::from_rows(
        ["Probe"],
        [["A"], ["B"], ["X"], ["C"], ["D"], ["X"]],
    );
    let mut rules = RuleSet::with_columns(["Probe"], Vec::<String>::new());
    rules.unique_columns.push("Probe".to_string());

    let report = validate_table(&table, &rules, None, &LinkCheckOptions::default());
    let rows: Vec<usize> = report.iter().filter_map(|v| v.row_index()).collect();
    assert_eq!(rows, vec![2, 5]);
}

#[test]
fn test_checks_run_in_pipeline_order() {
    let table = Table::from_rows(
        ["Id", "Kind", "URL"],
        [
            ["1", "bad", "https://dead.example"],
            ["1", "good", "https://ok.example"],
        ],
    );
    let mut rules = RuleSet::with_columns(["Id", "Kind", "URL"], Vec::<String>::new());
    rules.unique_columns.push("Id".to_string());
    rules.set_enum("Kind", ["good"]);
    rules.single_url_columns.push("URL".to_string());

    let checker = |url: &str| {
        if url.contains("dead") {
            LinkStatus::NotFound { code: 404 }
        } else {
            LinkStatus::Reachable
        }
    };
    let report = validate_table(&table, &rules, Some(&checker), &quick_options());
    let categories: Vec<ViolationCategory> = report.iter().map(|v| v.category()).collect();
    assert_eq!(
        categories,
        vec![
            ViolationCategory::Cell,
            ViolationCategory::Cell,
            ViolationCategory::Cell,
            ViolationCategory::Link,
        ]
    );
    assert!(matches!(
        report.violations[2].kind,
        ViolationKind::NotAllowed { .. }
    ));
}

#[test]
fn test_links_are_not_checked_without_a_checker() {
    let table = Table::from_rows(["URL"], [["https://dead.example"]]);
    let mut rules = RuleSet::with_columns(["URL"], Vec::<String>::new());
    rules.single_url_columns.push("URL".to_string());
    assert!(validate_table(&table, &rules, None, &quick_options()).is_valid());
}

#[test]
fn test_repeated_targets_are_checked_each_time() {
    let table = Table::from_rows(
        ["URL", "DOI"],
        [["https://a.example", "10.1/x"], ["https://a.example", "10.1/x"]],
    );
    let mut rules = RuleSet::with_columns(["URL", "DOI"], Vec::<String>::new());
    rules.single_url_columns.push("URL".to_string());
    rules.single_doi_columns.push("DOI".to_string());

    let calls = Mutex::new(Vec::new());
    let checker = |url: &str| {
        calls.lock().unwrap().push(url.to_string());
        LinkStatus::Reachable
    };
    let report = validate_table(&table, &rules, Some(&checker), &quick_options());
    assert!(report.is_valid());

    let mut calls = calls.into_inner().unwrap();
    calls.sort();
    assert_eq!(
        calls,
        vec![
            "https://a.example",
            "https://a.example",
            "https://doi.org/10.1/x",
            "https://doi.org/10.1/x",
        ]
    );
}

#[test]
fn test_report_json_names_row_column_and_kind() {
    let table = Table::from_rows(["Name", "Target"], [["", "CD3"]]);
    let rules = RuleSet::with_columns(["Name", "Target"], Vec::<String>::new());
    let report = validate_table(&table, &rules, None, &LinkCheckOptions::default());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "violations": [
                {"row": {"index": 0}, "column": "Name", "kind": "required_missing"}
            ]
        })
    );
}

proptest! {
    #[test]
    fn prop_multi_enum_accepts_exactly_allowed_values(
        cells in proptest::collection::vec(
            proptest::collection::vec(prop_oneof!["a", "b", "c", "z"], 0..4),
            1..8,
        )
    ) {
        let rows: Vec<Vec<String>> = cells.iter().map(|parts| vec![parts.join("; ")]).collect();
        let table = Table::from_rows(["Tags"], rows);
        let mut rules = RuleSet::with_columns(["Tags"], Vec::<String>::new());
        rules.set_multi_enum("Tags", ["a", "b", "c"]);

        let report = validate_membership(&table, &rules);
        let expected = cells.iter().flatten().filter(|part| part.as_str() == "z").count();
        prop_assert_eq!(report.len(), expected);
    }

    #[test]
    fn prop_validation_is_deterministic(
        values in proptest::collection::vec("[a-c]{0,2}", 0..12)
    ) {
        let rows: Vec<Vec<String>> = values.iter().map(|v| vec![v.clone()]).collect();
        let table = Table::from_rows(["Id"], rows);
        let mut rules = RuleSet::with_columns(["Id"], Vec::<String>::new());
        rules.unique_columns.push("Id".to_string());

        let first = validate_table(&table, &rules, None, &LinkCheckOptions::default());
        let second = validate_table(&table, &rules, None, &LinkCheckOptions::default());
        prop_assert_eq!(first, second);
    }
}
