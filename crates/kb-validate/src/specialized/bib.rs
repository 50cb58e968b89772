//! BibTeX bibliography validation.
//!
//! Parsing is done by `biblatex`; `@comment`, `@string` and `@preamble`
//! blocks are handled there. This module checks the parsed entries: every
//! entry has the required fields and citation keys are unique.

use std::collections::HashMap;

use biblatex::RawBibliography;
use kb_model::{ValidationReport, Violation, ViolationKind};

/// Fields every entry must have (compared case-insensitively).
pub const REQUIRED_FIELDS: &[&str] = &["author", "title", "year", "doi", "note"];

/// A parsed bibliography entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    /// Lowercased entry type (`article`, `book`, ...).
    pub entry_type: String,
    pub key: String,
    /// Lowercased field names, in file order.
    pub fields: Vec<String>,
    /// One-based line where the entry starts.
    pub line: usize,
}

impl BibEntry {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.eq_ignore_ascii_case(name))
    }
}

/// Text that is not valid BibTeX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibSyntaxError {
    pub line: usize,
    pub message: String,
}

/// Parse BibTeX text into its entries.
pub fn parse_bibtex(text: &str) -> Result<Vec<BibEntry>, BibSyntaxError> {
    let raw = RawBibliography::parse(text).map_err(|error| BibSyntaxError {
        line: line_of(text, error.span.start),
        message: error.to_string(),
    })?;
    Ok(raw
        .entries
        .iter()
        .map(|entry| BibEntry {
            entry_type: entry.v.kind.v.to_ascii_lowercase(),
            key: entry.v.key.v.to_string(),
            fields: entry
                .v
                .fields
                .iter()
                .map(|pair| pair.key.v.to_ascii_lowercase())
                .collect(),
            line: line_of(text, entry.span.start),
        })
        .collect())
}

/// Validate BibTeX text: syntax, missing required fields and duplicate
/// citation keys. A syntax error is the only violation reported.
pub fn validate_bibtex(text: &str) -> ValidationReport {
    let mut report = ValidationReport::new();
    let entries = match parse_bibtex(text) {
        Ok(entries) => entries,
        Err(error) => {
            report.add(Violation::line(
                error.line,
                ViolationKind::MalformedRecord {
                    detail: error.message,
                },
            ));
            return report;
        }
    };

    for entry in &entries {
        for field in REQUIRED_FIELDS {
            if !entry.has_field(field) {
                report.add(Violation::keyed(
                    entry.key.as_str(),
                    ViolationKind::MissingField {
                        field: (*field).to_string(),
                    },
                ));
            }
        }
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for entry in &entries {
        let count = counts.entry(entry.key.as_str()).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(entry.key.as_str());
        }
    }
    for key in order {
        report.add(Violation::keyed(
            key,
            ViolationKind::DuplicateKey {
                key: key.to_string(),
            },
        ));
    }

    tracing::info!(
        entries = entries.len(),
        violations = report.len(),
        "bibliography checked"
    );
    report
}

fn line_of(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
