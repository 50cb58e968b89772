//! Batch creation of supporting-material pages.
//!
//! The input follows the `reagent_resources.csv` layout plus two columns:
//! `Publications` (`;`-separated names of markdown files next to the CSV) and
//! free-text `Notes`. Each row carries exactly one ORCID, in either `Agree` or
//! `Disagree`. One page is produced per (target, conjugate) pair and ORCID,
//! at `<root>/<target>_<conjugate>/<orcid>.md`.
//!
//! Pages are meant for initial creation; merging them into existing pages is
//! a manual step.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use kb_ingest::IngestError;
use kb_model::{
    NOT_APPLICABLE, RowView, Table, orcid_link, split_multi, spreadsheet_line, supporting_dir_name,
};

use super::require_columns;
use crate::error::{ConvertError, Result};
use crate::markdown::pipe_table;
use crate::template::{Template, write_output};

pub const CONFIGURATIONS_TOKEN: &str = "configurations_table";
pub const NOTES_TOKEN: &str = "notes";
pub const PUBLICATIONS_TOKEN: &str = "publications";

const TARGET: &str = "Target Name / Protein Biomarker";
const CONJUGATE: &str = "Conjugate";
const CONTRIBUTOR: &str = "Contributor";
const AGREE: &str = "Agree";
const DISAGREE: &str = "Disagree";
const PUBLICATIONS: &str = "Publications";
const NOTES: &str = "Notes";

/// A rendered page and its path relative to the supporting-material root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportingPage {
    pub path: PathBuf,
    pub contents: String,
}

fn row_orcids(row: RowView<'_>) -> impl Iterator<Item = &str> {
    split_multi(row.get(AGREE))
        .chain(split_multi(row.get(DISAGREE)))
        .filter(|orcid| *orcid != NOT_APPLICABLE)
}

/// The single ORCID of a batch row.
fn row_orcid(row: RowView<'_>) -> &str {
    row_orcids(row).next().unwrap_or_default()
}

fn publication_names(cell: &str) -> impl Iterator<Item = &str> {
    split_multi(cell)
}

/// Read `<dir>/<name>.md` for every publication the table mentions.
///
/// Missing files are skipped with a warning.
pub fn load_publications(table: &Table, dir: &Path) -> Result<BTreeMap<String, String>> {
    let names: BTreeSet<&str> = table
        .iter_rows()
        .flat_map(|row| publication_names(row.get(PUBLICATIONS)))
        .collect();
    let mut publications = BTreeMap::new();
    for name in names {
        let path = dir.join(format!("{name}.md"));
        match kb_ingest::read_text(&path) {
            Ok(text) => {
                publications.insert(name.to_string(), text.trim_end().to_string());
            }
            Err(IngestError::FileNotFound { .. }) => {
                tracing::warn!(path = %path.display(), "publication file does not exist, ignoring");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(publications)
}

fn numbered(items: &[&str]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| format!("{}. {item}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one page for `orcid` from the rows that name it.
fn render_page(
    template: &Template,
    headers: &[String],
    rows: &[RowView<'_>],
    orcid: &str,
    publications: &BTreeMap<String, String>,
) -> Result<String> {
    let mut notes: Vec<&str> = Vec::new();
    for row in rows {
        let note = row.get(NOTES);
        if !note.is_empty() && !notes.contains(&note) {
            notes.push(note);
        }
    }

    let cited: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| publication_names(row.get(PUBLICATIONS)))
        .filter(|name| publications.contains_key(*name))
        .collect();
    let cited: Vec<&str> = cited.into_iter().collect();

    let columns: Vec<&String> = headers.iter().filter(|h| h.as_str() != PUBLICATIONS).collect();
    let mut configurations = Table::new(columns.iter().map(|h| (*h).clone()).collect());
    for row in rows {
        let numbers: Vec<String> = publication_names(row.get(PUBLICATIONS))
            .filter_map(|name| cited.iter().position(|c| *c == name))
            .map(|idx| format!("[{}](#publications)", idx + 1))
            .collect();
        let cells = columns
            .iter()
            .map(|column| {
                let value = row.get(column);
                match column.as_str() {
                    AGREE | DISAGREE if split_multi(value).any(|v| v == orcid) => {
                        if numbers.is_empty() {
                            orcid_link(orcid)
                        } else {
                            format!("{} [{}]", orcid_link(orcid), numbers.join(", "))
                        }
                    }
                    CONTRIBUTOR if !value.is_empty() => orcid_link(value),
                    NOTES if !value.is_empty() => {
                        let idx = notes.iter().position(|n| *n == value).unwrap_or_default();
                        format!("[{}](#notes)", idx + 1)
                    }
                    _ => value.to_string(),
                }
            })
            .collect();
        configurations.push_row(cells);
    }

    let notes_section = format!("<a name=\"notes\"></a>\n{}", numbered(&notes));
    let publication_texts: Vec<&str> = cited
        .iter()
        .filter_map(|name| publications.get(*name).map(String::as_str))
        .collect();
    let publications_section = if publication_texts.is_empty() {
        String::new()
    } else {
        format!("<a name=\"publications\"></a>\n{}", numbered(&publication_texts))
    };

    template.render_with_optional(
        &[(CONFIGURATIONS_TOKEN, &pipe_table(&configurations))],
        &[(NOTES_TOKEN, &notes_section), (PUBLICATIONS_TOKEN, &publications_section)],
    )
}

/// Render every page in memory. Nothing is written.
pub fn render_supporting_pages(
    template: &Template,
    table: &Table,
    publications: &BTreeMap<String, String>,
) -> Result<Vec<SupportingPage>> {
    require_columns(
        table,
        &[TARGET, CONJUGATE, CONTRIBUTOR, AGREE, DISAGREE, PUBLICATIONS, NOTES],
        "supporting material table",
    )?;

    let offending: Vec<usize> = table
        .iter_rows()
        .enumerate()
        .filter(|(_, row)| row_orcids(*row).count() != 1)
        .map(|(index, _)| spreadsheet_line(index))
        .collect();
    if !offending.is_empty() {
        return Err(ConvertError::OrcidCount { lines: offending });
    }

    let mut pairs: Vec<(&str, &str)> = Vec::new();
    for row in table.iter_rows() {
        let pair = (row.get(TARGET), row.get(CONJUGATE));
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }

    let mut pages = Vec::new();
    for (target, conjugate) in pairs {
        let pair_rows: Vec<RowView<'_>> = table
            .iter_rows()
            .filter(|row| row.get(TARGET) == target && row.get(CONJUGATE) == conjugate)
            .collect();
        // Agreeing ORCIDs first, then disagreeing ones, in row order.
        let mut orcids: Vec<&str> = Vec::new();
        for column in [AGREE, DISAGREE] {
            for row in &pair_rows {
                for orcid in split_multi(row.get(column)).filter(|o| *o != NOT_APPLICABLE) {
                    if !orcids.contains(&orcid) {
                        orcids.push(orcid);
                    }
                }
            }
        }

        let dir = PathBuf::from(supporting_dir_name(target, conjugate));
        for orcid in orcids {
            let rows: Vec<RowView<'_>> = pair_rows
                .iter()
                .copied()
                .filter(|row| row_orcid(*row) == orcid)
                .collect();
            let contents = render_page(template, &table.headers, &rows, orcid, publications)?;
            pages.push(SupportingPage {
                path: dir.join(format!("{orcid}.md")),
                contents,
            });
        }
    }
    Ok(pages)
}

/// Generate supporting-material pages under `output_root`.
///
/// Publication files are looked up next to `csv_path`. All pages are rendered
/// before the first one is written.
pub fn write_supporting_md(
    template_path: &Path,
    csv_path: &Path,
    output_root: &Path,
) -> Result<Vec<PathBuf>> {
    let template = Template::load(template_path)?;
    let table = kb_ingest::read_table(csv_path)?;
    let csv_dir = csv_path.parent().unwrap_or_else(|| Path::new("."));
    let publications = load_publications(&table, csv_dir)?;
    let pages = render_supporting_pages(&template, &table, &publications)?;

    let mut written = Vec::with_capacity(pages.len());
    for page in pages {
        let path = output_root.join(&page.path);
        let (dir, name) = match (path.parent(), path.file_name()) {
            (Some(dir), Some(name)) => (dir.to_path_buf(), name.to_string_lossy().into_owned()),
            _ => return Err(ConvertError::TemplateName { path }),
        };
        written.push(write_output(&dir, &name, &page.contents)?);
    }
    Ok(written)
}
