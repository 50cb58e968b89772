//! `image_resources.csv` validation.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use kb_ingest::{IngestError, list_files_recursive};
use kb_model::{RuleSet, Table, ValidationReport, Violation, ViolationKind};
use md5::{Digest, Md5};

use crate::link::{LinkCheckOptions, LinkChecker};
use crate::pipeline::validate_table;

const FILE_COLUMN: &str = "file";
const MD5_COLUMN: &str = "md5";

/// File names that may sit next to images without a table row.
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Lowercase hex MD5 digest of a file's contents.
pub fn md5_hex(path: &Path) -> kb_ingest::Result<String> {
    let mut file = File::open(path).map_err(|e| IngestError::from_io(path, e))?;
    let mut hasher = Md5::new();
    std::io::copy(&mut file, &mut hasher).map_err(|e| IngestError::from_io(path, e))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Validate the image resources table against the files under `root`.
///
/// After the generic rules pass, every `file` must exist below `root` with
/// the recorded `md5`, and every non-markdown file below `root` must be
/// listed in the table.
pub fn validate_images(
    table: &Table,
    rules: &RuleSet,
    root: &Path,
    checker: Option<&dyn LinkChecker>,
    options: &LinkCheckOptions,
) -> kb_ingest::Result<ValidationReport> {
    let mut report = validate_table(table, rules, checker, options);
    if !report.is_empty() {
        return Ok(report);
    }
    for column in [FILE_COLUMN, MD5_COLUMN] {
        if !table.has_column(column) {
            report.add(Violation::column(column, ViolationKind::MissingColumn));
        }
    }
    if !report.is_empty() {
        return Ok(report);
    }

    let span = tracing::info_span!("images", root = %root.display());
    let _guard = span.enter();

    let mut listed = BTreeSet::new();
    for (idx, row) in table.iter_rows().enumerate() {
        let path = root.join(row.get(FILE_COLUMN));
        if !path.is_file() {
            report.add(Violation::cell(
                idx,
                FILE_COLUMN,
                ViolationKind::MissingFile { path },
            ));
            continue;
        }
        let actual = md5_hex(&path)?;
        let expected = row.get(MD5_COLUMN);
        if !actual.eq_ignore_ascii_case(expected) {
            report.add(Violation::cell(
                idx,
                MD5_COLUMN,
                ViolationKind::ChecksumMismatch {
                    path: path.clone(),
                    expected: expected.to_string(),
                    actual,
                },
            ));
        }
        listed.insert(canonical(&path));
    }

    for path in list_files_recursive(root)? {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if name.ends_with(".md") || IGNORED_FILES.contains(&name) {
            continue;
        }
        if !listed.contains(&canonical(&path)) {
            report.add(Violation::keyed(
                path.display().to_string(),
                ViolationKind::SuperfluousFile { path },
            ));
        }
    }

    tracing::info!(images = listed.len(), violations = report.len(), "images checked");
    Ok(report)
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
