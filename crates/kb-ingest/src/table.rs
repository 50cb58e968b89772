//! CSV table loading.
//!
//! Input files are UTF-8, optionally with a byte-order mark. Files that are
//! not valid UTF-8 are decoded as Windows-1252, which is what spreadsheet
//! exports of the glossary files use.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use csv::ReaderBuilder;
use kb_model::Table;

use crate::error::{IngestError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Read a CSV file into a [`Table`].
///
/// Header names and cells are trimmed. Repeated header names are rejected.
/// Rows shorter than the header are padded with empty cells; longer rows are
/// rejected.
pub fn read_table(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::from_io(path, e))?;
    let text = decode_text(&bytes, path);
    let table = parse_table(&text, path)?;
    tracing::debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.len(),
        "loaded table"
    );
    Ok(table)
}

/// Read a CSV file and require the given columns to be present.
pub fn read_table_with_columns(path: &Path, columns: &[&str]) -> Result<Table> {
    let table = read_table(path)?;
    if let Some(missing) = columns.iter().find(|column| !table.has_column(column)) {
        return Err(IngestError::MissingColumn {
            column: (*missing).to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(table)
}

/// Non-empty values of one column, in row order.
pub fn read_column_values(path: &Path, column: &str) -> Result<Vec<String>> {
    let table = read_table_with_columns(path, &[column])?;
    Ok(table
        .iter_rows()
        .map(|row| row.get(column))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect())
}

/// Parse CSV text. `path` is only used for error messages.
pub fn parse_table(text: &str, path: &Path) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(|header| header.trim_matches('\u{feff}').trim().to_string())
        .collect();
    if headers.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    if let Some(column) = first_duplicate(&headers) {
        return Err(IngestError::DuplicateColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        });
    }

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        if record.len() > table.headers.len() {
            return Err(IngestError::RaggedRow {
                path: path.to_path_buf(),
                line: record.position().map_or(0, csv::Position::line),
                expected: table.headers.len(),
                found: record.len(),
            });
        }
        table.push_row(record.iter().map(|cell| cell.trim().to_string()).collect());
    }
    Ok(table)
}

fn first_duplicate(headers: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .find(|header| !seen.insert(header.as_str()))
        .map(String::as_str)
}

/// Read a whole text file (templates, markdown pages, BibTeX).
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::from_io(path, e))?;
    Ok(decode_text(&bytes, path).into_owned())
}

fn decode_text<'a>(bytes: &'a [u8], path: &Path) -> Cow<'a, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            tracing::debug!(path = %path.display(), "not UTF-8, decoding as Windows-1252");
            encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes).0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_read_table_trims_cells_and_strips_bom() {
        let file = temp_csv(b"\xEF\xBB\xBFName , Target\n Alice ,CD3 \n");
        let table = read_table(file.path()).unwrap();
        assert_eq!(table.headers, vec!["Name", "Target"]);
        assert_eq!(table.rows[0], vec!["Alice", "CD3"]);
    }

    #[test]
    fn test_quoted_cells_keep_separators_and_newlines() {
        let file = temp_csv(b"A,B\n\"x, y\",\"line1\nline2\"\n");
        let table = read_table(file.path()).unwrap();
        assert_eq!(table.value(0, "A"), Some("x, y"));
        assert_eq!(table.value(0, "B"), Some("line1\nline2"));
    }

    #[test]
    fn test_windows_1252_fallback() {
        // 0xE9 is 'é' in Windows-1252 and invalid on its own in UTF-8.
        let file = temp_csv(b"Term,Definition\nCaf\xE9,drink\n");
        let table = read_table(file.path()).unwrap();
        assert_eq!(table.value(0, "Term"), Some("Café"));
    }

    #[test]
    fn test_windows_1252_fallback_with_bom() {
        let file = temp_csv(b"\xEF\xBB\xBFTerm,Definition\nNa\xEFve,T cell\n");
        let table = read_table(file.path()).unwrap();
        assert_eq!(table.headers, vec!["Term", "Definition"]);
        assert_eq!(table.value(0, "Term"), Some("Na\u{ef}ve"));
    }

    #[test]
    fn test_duplicate_headers_are_rejected() {
        let file = temp_csv(b"Name,Target,Name\nIBEX,CD3,\n");
        let err = read_table(file.path()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::DuplicateColumn { ref column, .. } if column == "Name"
        ));
    }

    #[test]
    fn test_headers_equal_after_trimming_are_duplicates() {
        let file = temp_csv(b"Name, Name \nIBEX,x\n");
        let err = read_table(file.path()).unwrap_err();
        assert!(matches!(err, IngestError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let file = temp_csv(b"A,B,C\n1,2\n");
        let table = read_table(file.path()).unwrap();
        assert_eq!(table.rows[0], vec!["1", "2", ""]);
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let file = temp_csv(b"A,B\n1,2,3\n");
        let err = read_table(file.path()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::RaggedRow {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let file = temp_csv(b"");
        let err = read_table(file.path()).unwrap_err();
        assert!(matches!(err, IngestError::EmptyCsv { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = read_table(Path::new("/nonexistent/kb/table.csv")).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }

    #[test]
    fn test_read_column_values_requires_column() {
        let file = temp_csv(b"Vendor,URL\nBioLegend,https://biolegend.com\n,\nAbcam,\n");
        let vendors = read_column_values(file.path(), "Vendor").unwrap();
        assert_eq!(vendors, vec!["BioLegend", "Abcam"]);

        let err = read_column_values(file.path(), "Name").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { .. }));
    }
}
