//! One module per generated page.

pub mod contributors;
pub mod data_software;
pub mod glossary;
pub mod index_stats;
pub mod probes;
pub mod protocols;
pub mod reagent_resources;
pub mod supporting;
pub mod videos;

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use kb_model::Table;

use crate::error::{ConvertError, Result};
use crate::template::{Template, write_output};

/// Fail with [`ConvertError::MissingColumn`] unless every column exists.
pub(crate) fn require_columns(table: &Table, columns: &[&str], source_name: &str) -> Result<()> {
    match columns.iter().find(|column| !table.has_column(column)) {
        Some(column) => Err(ConvertError::MissingColumn {
            column: (*column).to_string(),
            source_name: source_name.to_string(),
        }),
        None => Ok(()),
    }
}

/// Order numbers numerically and before any non-numeric text.
pub(crate) fn compare_numeric_first(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Write `rendered` next to the other outputs under the template's output name.
pub(crate) fn write_page(
    template: &Template,
    output_dir: &Path,
    rendered: &str,
) -> Result<PathBuf> {
    write_output(output_dir, template.output_name(), rendered)
}
