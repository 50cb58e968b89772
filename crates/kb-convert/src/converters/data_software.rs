//! `data_software.md` from `datasets.csv` and `software.csv`.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use kb_model::{RowView, Table};

use super::{compare_numeric_first, require_columns, write_page};
use crate::error::Result;
use crate::markdown::{details, doi_links, link, pipe_table};
use crate::template::Template;

pub const DATA_TOKEN: &str = "data_table";
pub const SOFTWARE_TOKEN: &str = "software_table";

const PUBLICATIONS: &str = "Associated Publication DOIs";
const DATASET_COLUMNS: [&str; 6] = ["Title", "Details", "Year", "URL", PUBLICATIONS, "License"];
const SOFTWARE_COLUMNS: [&str; 8] = [
    "Title",
    "Details",
    "Year",
    "URL",
    "Repository",
    "Language",
    "License",
    PUBLICATIONS,
];

fn close_title(mut title: String, row: RowView<'_>) -> String {
    let dois = doi_links(row.get(PUBLICATIONS));
    if !dois.is_empty() {
        title.push_str(", associated publication DOIs: ");
        title.push_str(&dois);
    }
    title.push(']');
    title
}

fn dataset_title(row: RowView<'_>) -> String {
    let title = format!(
        "{} [{}, license: {}",
        row.get("Title"),
        link("download", row.get("URL")),
        row.get("License")
    );
    close_title(title, row)
}

fn software_title(row: RowView<'_>) -> String {
    let mut title = format!(
        "{} [{}, license: {}",
        row.get("Title"),
        link("download", row.get("URL")),
        row.get("License")
    );
    let language = row.get("Language");
    if !language.is_empty() {
        title.push_str(&format!(", language: {language}"));
    }
    let repository = row.get("Repository");
    if !repository.is_empty() {
        title.push_str(&format!(", {}", link("repository", repository)));
    }
    close_title(title, row)
}

fn newest_first(a: &RowView<'_>, b: &RowView<'_>) -> Ordering {
    compare_numeric_first(b.get("Year"), a.get("Year"))
}

fn titled_table(table: &Table, title: fn(RowView<'_>) -> String) -> Table {
    let mut rows: Vec<RowView<'_>> = table.iter_rows().collect();
    rows.sort_by(newest_first);
    Table::from_rows(
        ["Title", "Details"],
        rows.into_iter().map(|row| [title(row), details(row.get("Details"))]),
    )
}

pub fn dataset_table(table: &Table) -> Result<Table> {
    require_columns(table, &DATASET_COLUMNS, "datasets table")?;
    Ok(titled_table(table, dataset_title))
}

pub fn software_table(table: &Table) -> Result<Table> {
    require_columns(table, &SOFTWARE_COLUMNS, "software table")?;
    Ok(titled_table(table, software_title))
}

pub fn render_data_software(
    template: &Template,
    datasets: &Table,
    software: &Table,
) -> Result<String> {
    let data = pipe_table(&dataset_table(datasets)?);
    let software = pipe_table(&software_table(software)?);
    template.render(&[(DATA_TOKEN, &data), (SOFTWARE_TOKEN, &software)])
}

pub fn write_data_software_md(
    template_path: &Path,
    datasets_path: &Path,
    software_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let template = Template::load(template_path)?;
    let datasets = kb_ingest::read_table(datasets_path)?;
    let software = kb_ingest::read_table(software_path)?;
    let rendered = render_data_software(&template, &datasets, &software)?;
    write_page(&template, output_dir, &rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_title_lists_publications() {
        let table = Table::from_rows(
            DATASET_COLUMNS,
            [
                ["Old", "", "2019", "https://d/1", "", "CC-BY-4.0"],
                ["New", "", "2023", "https://d/2", "10.1/a; 10.2/b", "CC0"],
            ],
        );
        let titles = dataset_table(&table).unwrap().column_values("Title").unwrap().join("\n");
        insta::assert_snapshot!(titles, @r"
        New [[download](https://d/2), license: CC0, associated publication DOIs: [10.1/a](https://doi.org/10.1/a), [10.2/b](https://doi.org/10.2/b)]
        Old [[download](https://d/1), license: CC-BY-4.0]
        ");
    }

    #[test]
    fn software_title_includes_language_and_repository() {
        let table = Table::from_rows(
            SOFTWARE_COLUMNS,
            [["SimpleITK", "", "2020", "https://s", "https://git/s", "Python", "Apache-2.0", ""]],
        );
        let software = software_table(&table).unwrap();
        assert_eq!(
            software.rows[0][0],
            "SimpleITK [[download](https://s), license: Apache-2.0, language: Python, [repository](https://git/s)]"
        );
    }
}
