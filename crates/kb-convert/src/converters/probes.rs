//! `fluorescent_probes.md`, sorted by excitation then emission maximum.

use std::path::{Path, PathBuf};

use kb_model::Table;

use super::{compare_numeric_first, require_columns, write_page};
use crate::error::Result;
use crate::markdown::pipe_table;
use crate::template::Template;

pub const PROBES_TOKEN: &str = "probe_table";

pub const EXCITATION_COLUMN: &str = "Excitation Max (nm)";
pub const EMISSION_COLUMN: &str = "Emission Max (nm)";

/// Every column of the probes table, rows sorted by spectrum.
pub fn sorted_probes(table: &Table) -> Result<Table> {
    require_columns(table, &[EXCITATION_COLUMN, EMISSION_COLUMN], "fluorescent probes table")?;
    let mut rows: Vec<_> = table.iter_rows().collect();
    rows.sort_by(|a, b| {
        compare_numeric_first(a.get(EXCITATION_COLUMN), b.get(EXCITATION_COLUMN))
            .then_with(|| compare_numeric_first(a.get(EMISSION_COLUMN), b.get(EMISSION_COLUMN)))
    });
    Ok(Table::from_rows(
        table.headers.iter().cloned(),
        rows.into_iter().map(|row| row.cells().to_vec()),
    ))
}

pub fn render_probes(template: &Template, table: &Table) -> Result<String> {
    let markdown = pipe_table(&sorted_probes(table)?);
    template.render(&[(PROBES_TOKEN, &markdown)])
}

pub fn write_probes_md(
    template_path: &Path,
    csv_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let template = Template::load(template_path)?;
    let table = kb_ingest::read_table(csv_path)?;
    let rendered = render_probes(&template, &table)?;
    write_page(&template, output_dir, &rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_sort_numerically() {
        let table = Table::from_rows(
            ["Fluorescent Probe", EXCITATION_COLUMN, EMISSION_COLUMN],
            [
                ["AF647", "650", "665"],
                ["BV421", "405", "421"],
                ["AF488", "495", "519"],
                ["BUV395", "348", "395"],
                ["Odd", "495", "500"],
            ],
        );
        let sorted = sorted_probes(&table).unwrap();
        let names: Vec<&str> = sorted.rows.iter().map(|row| row[0].as_str()).collect();
        assert_eq!(names, vec!["BUV395", "BV421", "Odd", "AF488", "AF647"]);
    }
}
