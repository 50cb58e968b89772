//! Markdown fragments shared by the converters.

use kb_model::{DOI_RESOLVER, Table, split_multi};

/// Words of a description shown in a collapsed accordion summary.
pub const SUMMARY_WORDS: usize = 3;

/// Render a table in pipe format with every column left aligned.
///
/// Column width is the longest cell, and at least the header plus two.
/// Newlines inside cells become `<br>`, since a table row cannot span lines.
pub fn pipe_table(table: &Table) -> String {
    let headers: Vec<String> = table.headers.iter().map(|h| one_line(h)).collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|cells| cells.iter().map(|cell| one_line(cell)).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .map(|row| display_width(&row[idx]))
                .fold(display_width(header) + 2, usize::max)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(pipe_row(&headers, &widths));
    let separator: Vec<String> = widths
        .iter()
        .map(|width| format!(":{}", "-".repeat(width + 1)))
        .collect();
    lines.push(format!("|{}|", separator.join("|")));
    lines.extend(rows.iter().map(|row| pipe_row(row, &widths)));
    lines.join("\n")
}

fn pipe_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width - display_width(cell);
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    format!("| {} |", padded.join(" | "))
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn one_line(cell: &str) -> String {
    cell.replace("\r\n", "<br>").replace('\n', "<br>")
}

/// Collapsible `details` block for a free-text description.
///
/// The summary is the first [`SUMMARY_WORDS`] words followed by `...`. Blank
/// descriptions render as an empty string.
pub fn details(description: &str) -> String {
    if description.trim().is_empty() {
        return String::new();
    }
    let summary: Vec<&str> = description.split_whitespace().take(SUMMARY_WORDS).collect();
    format!(
        "{{::nomarkdown}}<details ><summary>{}...</summary><p>{description}</p></details>{{:/}}",
        summary.join(" ")
    )
}

pub fn link(text: &str, target: &str) -> String {
    format!("[{text}]({target})")
}

/// Comma-separated DOI links for a multi-value DOI cell.
pub fn doi_links(cell: &str) -> String {
    split_multi(cell)
        .map(|doi| link(doi, &format!("{DOI_RESOLVER}{doi}")))
        .collect::<Vec<_>>()
        .join(", ")
}
