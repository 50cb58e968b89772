//! Violations and the report that collects them.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::table::spreadsheet_line;

/// Maximum number of allowed values spelled out in a violation message.
const MAX_LISTED_VALUES: usize = 10;

/// Identifies the record a violation refers to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowRef {
    /// Zero-based data row index of a table.
    Index(usize),
    /// Identifying key of a non-tabular record (citation key, ORCID, file path).
    Key(String),
    /// One-based line of a text input that could not be split into records.
    Line(usize),
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRef::Index(idx) => write!(f, "row {idx} (line {})", spreadsheet_line(*idx)),
            RowRef::Key(key) => write!(f, "entry '{key}'"),
            RowRef::Line(line) => write!(f, "line {line}"),
        }
    }
}

/// Broad class of a violation, used for summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// Column coverage mismatch; makes row-level checks meaningless.
    Schema,
    /// Per-cell rule failure.
    Cell,
    /// A link target that could not be confirmed reachable.
    Link,
    /// Consistency between rows, records or files.
    Consistency,
}

impl ViolationCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Cell => "cell",
            Self::Link => "link",
            Self::Consistency => "consistency",
        }
    }
}

/// What went wrong; each variant carries only the data it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    // Schema
    /// Column listed as both required and optional.
    OverlappingColumn,
    /// Table header names the same column more than once.
    DuplicateColumn,
    /// Table column not declared as required or optional.
    UnexpectedColumn,
    /// Declared column absent from the table.
    MissingColumn,
    /// A rule references a column that is not declared.
    UndeclaredRuleColumn { rule: String },

    // Cell
    /// Required cell is empty.
    RequiredMissing,
    /// Value appears in more than one row of a unique column.
    DuplicateValue { value: String, rows: Vec<usize> },
    /// Value repeated inside one multi-value cell.
    DuplicateInCell { value: String },
    /// Value not in the allowed set.
    NotAllowed { value: String, allowed: Vec<String> },

    // Link
    /// Target answered with a failure status.
    LinkNotFound { url: String, status: u16 },
    /// Target could not be checked (connection error, timeout).
    LinkUnreachable { url: String, reason: String },

    // Consistency
    /// Rows identical on the compared columns.
    DuplicateRow { rows: Vec<usize> },
    /// Contributor absent from the agree/disagree lists.
    ContributorNotListed { contributor: String },
    /// Too many ORCIDs in one cell.
    TooManyOrcids { count: usize, max: usize },
    /// ORCID listed as both agreeing and disagreeing.
    OrcidInBoth { orcid: String },
    /// Expected file does not exist.
    MissingFile { path: PathBuf },
    /// File content digest differs from the recorded value.
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
    /// File present on disk without a matching record.
    SuperfluousFile { path: PathBuf },
    /// Generated page disagrees with the source table.
    ContentMismatch { path: PathBuf, detail: String },
    /// Record cannot be parsed.
    MalformedRecord { detail: String },
    /// Record lacks a required field.
    MissingField { field: String },
    /// Identifier used by more than one record.
    DuplicateKey { key: String },
    /// Field has the wrong JSON type.
    WrongType { expected: String, found: String },
    /// Records are not in the expected order.
    OrderViolation { detail: String },
}

impl ViolationKind {
    pub fn category(&self) -> ViolationCategory {
        match self {
            Self::OverlappingColumn
            | Self::DuplicateColumn
            | Self::UnexpectedColumn
            | Self::MissingColumn
            | Self::UndeclaredRuleColumn { .. } => ViolationCategory::Schema,
            Self::RequiredMissing
            | Self::DuplicateValue { .. }
            | Self::DuplicateInCell { .. }
            | Self::NotAllowed { .. } => ViolationCategory::Cell,
            Self::LinkNotFound { .. } | Self::LinkUnreachable { .. } => ViolationCategory::Link,
            _ => ViolationCategory::Consistency,
        }
    }

    /// Human-readable reason.
    pub fn reason(&self) -> String {
        match self {
            Self::OverlappingColumn => {
                "column declared as both required and optional".to_string()
            }
            Self::DuplicateColumn => "column appears more than once in the header".to_string(),
            Self::UnexpectedColumn => "column is not declared as required or optional".to_string(),
            Self::MissingColumn => "declared column is missing from the table".to_string(),
            Self::UndeclaredRuleColumn { rule } => {
                format!("column used by {rule} is not declared as required or optional")
            }
            Self::RequiredMissing => "required value missing".to_string(),
            Self::DuplicateValue { value, rows } => format!(
                "duplicate value '{value}' (rows {})",
                join_numbers(rows.iter().copied())
            ),
            Self::DuplicateInCell { value } => {
                format!("value '{value}' repeated within the same cell")
            }
            Self::NotAllowed { value, allowed } => {
                if allowed.len() <= MAX_LISTED_VALUES {
                    format!(
                        "value '{value}' is not one of the allowed values ({})",
                        allowed.join(", ")
                    )
                } else {
                    format!(
                        "value '{value}' is not one of the {} allowed values",
                        allowed.len()
                    )
                }
            }
            Self::LinkNotFound { url, status } => format!("{url} not found (HTTP {status})"),
            Self::LinkUnreachable { url, reason } => format!("{url} unreachable: {reason}"),
            Self::DuplicateRow { rows } => format!(
                "duplicate rows (rows {})",
                join_numbers(rows.iter().copied())
            ),
            Self::ContributorNotListed { contributor } => format!(
                "contributor {contributor} does not appear in the Agree or Disagree column"
            ),
            Self::TooManyOrcids { count, max } => {
                format!("{count} ORCIDs listed, at most {max} allowed")
            }
            Self::OrcidInBoth { orcid } => {
                format!("ORCID {orcid} appears in both the Agree and Disagree column")
            }
            Self::MissingFile { path } => format!("{} does not exist", path.display()),
            Self::ChecksumMismatch {
                path,
                expected,
                actual,
            } => format!(
                "{} has md5 {actual}, expected {expected}",
                path.display()
            ),
            Self::SuperfluousFile { path } => {
                format!("{} has no corresponding entry", path.display())
            }
            Self::ContentMismatch { path, detail } => {
                format!("{} does not match the source table: {detail}", path.display())
            }
            Self::MalformedRecord { detail } => format!("malformed record: {detail}"),
            Self::MissingField { field } => format!("missing required field '{field}'"),
            Self::DuplicateKey { key } => format!("duplicate key '{key}'"),
            Self::WrongType { expected, found } => {
                format!("unexpected type, expected {expected}, found {found}")
            }
            Self::OrderViolation { detail } => format!("unexpected order: {detail}"),
        }
    }
}

fn join_numbers(values: impl Iterator<Item = usize>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

/// A single reported failure of a validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub row: Option<RowRef>,
    pub column: Option<String>,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(kind: ViolationKind) -> Self {
        Self {
            row: None,
            column: None,
            kind,
        }
    }

    /// Violation attached to a column but not to a row (schema issues).
    pub fn column(column: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            row: None,
            column: Some(column.into()),
            kind,
        }
    }

    /// Violation attached to a table cell.
    pub fn cell(row: usize, column: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            row: Some(RowRef::Index(row)),
            column: Some(column.into()),
            kind,
        }
    }

    /// Violation attached to a whole table row.
    pub fn row(row: usize, kind: ViolationKind) -> Self {
        Self {
            row: Some(RowRef::Index(row)),
            column: None,
            kind,
        }
    }

    /// Violation attached to a keyed record.
    pub fn keyed(key: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            row: Some(RowRef::Key(key.into())),
            column: None,
            kind,
        }
    }

    /// Violation attached to a line of a text input.
    pub fn line(line: usize, kind: ViolationKind) -> Self {
        Self {
            row: Some(RowRef::Line(line)),
            column: None,
            kind,
        }
    }

    pub fn category(&self) -> ViolationCategory {
        self.kind.category()
    }

    pub fn reason(&self) -> String {
        self.kind.reason()
    }

    /// Zero-based row index, when the violation refers to a table row.
    pub fn row_index(&self) -> Option<usize> {
        match self.row {
            Some(RowRef::Index(idx)) => Some(idx),
            _ => None,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.row, &self.column) {
            (Some(row), Some(column)) => write!(f, "{row}, column '{column}': ")?,
            (Some(row), None) => write!(f, "{row}: ")?,
            (None, Some(column)) => write!(f, "column '{column}': ")?,
            (None, None) => {}
        }
        f.write_str(&self.reason())
    }
}

/// Ordered collection of violations. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Append all violations of `other`, keeping their order.
    pub fn merge(&mut self, other: ValidationReport) {
        self.violations.extend(other.violations);
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    pub fn count(&self, category: ViolationCategory) -> usize {
        self.violations
            .iter()
            .filter(|violation| violation.category() == category)
            .count()
    }
}

impl From<Vec<Violation>> for ValidationReport {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl Extend<Violation> for ValidationReport {
    fn extend<T: IntoIterator<Item = Violation>>(&mut self, iter: T) {
        self.violations.extend(iter);
    }
}

impl IntoIterator for ValidationReport {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_row_column_and_reason() {
        let violation = Violation::cell(0, "Name", ViolationKind::RequiredMissing);
        assert_eq!(
            violation.to_string(),
            "row 0 (line 2), column 'Name': required value missing"
        );
    }

    #[test]
    fn long_allowed_lists_are_summarised() {
        let allowed: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        let kind = ViolationKind::NotAllowed {
            value: "x".to_string(),
            allowed,
        };
        assert_eq!(kind.reason(), "value 'x' is not one of the 20 allowed values");
    }

    #[test]
    fn report_counts_by_category() {
        let report = ValidationReport::from(vec![
            Violation::column("A", ViolationKind::MissingColumn),
            Violation::cell(1, "B", ViolationKind::RequiredMissing),
            Violation::cell(
                2,
                "URL",
                ViolationKind::LinkNotFound {
                    url: "https://example.org".to_string(),
                    status: 404,
                },
            ),
        ]);
        assert_eq!(report.count(ViolationCategory::Schema), 1);
        assert_eq!(report.count(ViolationCategory::Cell), 1);
        assert_eq!(report.count(ViolationCategory::Link), 1);
        assert!(!report.is_valid());
    }

    #[test]
    fn report_serializes_with_flattened_kind() {
        let report = ValidationReport::from(vec![Violation::cell(
            3,
            "Vendor",
            ViolationKind::NotAllowed {
                value: "Acme".to_string(),
                allowed: vec!["BioLegend".to_string()],
            },
        )]);
        let json = serde_json::to_value(&report).expect("serialize report");
        let violation = &json["violations"][0];
        assert_eq!(violation["kind"], "not_allowed");
        assert_eq!(violation["row"]["index"], 3);
        assert_eq!(violation["value"], "Acme");
    }
}
