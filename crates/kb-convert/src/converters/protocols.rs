//! `protocols.md` from `protocols.csv`.

use std::path::{Path, PathBuf};

use kb_model::Table;

use super::{require_columns, write_page};
use crate::error::Result;
use crate::markdown::{details, pipe_table};
use crate::template::Template;

pub const PROTOCOLS_TOKEN: &str = "protocols_table";

const COLUMNS: [&str; 3] = ["Title", "URL", "Details"];

/// Title (linked to the full protocol) and collapsible details, in file order.
pub fn protocols_table(table: &Table) -> Result<Table> {
    require_columns(table, &COLUMNS, "protocols table")?;
    let rows = table.iter_rows().map(|row| {
        [
            format!("{} [[detailed protocol]({})].", row.get("Title"), row.get("URL")),
            details(row.get("Details")),
        ]
    });
    Ok(Table::from_rows(["Title", "Details"], rows))
}

pub fn render_protocols(template: &Template, table: &Table) -> Result<String> {
    let markdown = pipe_table(&protocols_table(table)?);
    template.render(&[(PROTOCOLS_TOKEN, &markdown)])
}

pub fn write_protocols_md(
    template_path: &Path,
    csv_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let template = Template::load(template_path)?;
    let table = kb_ingest::read_table(csv_path)?;
    let rendered = render_protocols(&template, &table)?;
    write_page(&template, output_dir, &rendered)
}
