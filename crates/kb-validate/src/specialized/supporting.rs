//! Reading the configurations table back out of a supporting-material page.

use std::sync::LazyLock;

use kb_model::Table;
use regex::Regex;

/// Heading that precedes the configurations table.
pub const CONFIGURATIONS_HEADING: &str = "# Configurations";

/// Bracketed ORCID as rendered in a markdown link: `[NNNN-NNNN-NNNN-NNNX]`.
static ORCID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d{4}-\d{4}-\d{4}-\d{3}[\dX])\]").expect("Invalid ORCID regex")
});

/// ORCIDs displayed in a markdown cell, in order of appearance.
pub fn extract_orcids(cell: &str) -> Vec<&str> {
    ORCID_REGEX
        .captures_iter(cell)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Parse the pipe table that follows the configurations heading.
///
/// Blank lines are ignored; the table ends at the first line that does not
/// start with `|`.
pub fn parse_configurations(text: &str) -> Result<Table, String> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    if !lines.by_ref().any(|line| line == CONFIGURATIONS_HEADING) {
        return Err(format!("no '{CONFIGURATIONS_HEADING}' section"));
    }

    let header = lines
        .next()
        .filter(|line| line.starts_with('|'))
        .ok_or_else(|| "configurations table is missing".to_string())?;
    let headers: Vec<String> = header
        .split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect();

    match lines.next() {
        Some(line) if is_separator(line) => {}
        _ => return Err("configurations table has no separator row".to_string()),
    }

    let mut table = Table::new(headers);
    for line in lines.take_while(|line| line.starts_with('|')) {
        let cells = split_row(line);
        if cells.len() != table.headers.len() {
            return Err(format!(
                "configurations row has {} cells, header has {}",
                cells.len(),
                table.headers.len()
            ));
        }
        table.push_row(cells);
    }
    Ok(table)
}

fn is_separator(line: &str) -> bool {
    line.starts_with('|')
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn split_row(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\
---
layout: default
---

# Configurations

| Target | Agree | Notes |
|:-------|:------|:------|
| CD3    | [0000-0003-0315-7727](https://orcid.org/0000-0003-0315-7727) [1] | [1](#notes) |

# Publications

1. Radtke et al.
";

    #[test]
    fn parses_the_configurations_table() {
        let table = parse_configurations(PAGE).unwrap();
        assert_eq!(table.headers, vec!["Target", "Agree", "Notes"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.value(0, "Target"), Some("CD3"));
        assert_eq!(extract_orcids(table.value(0, "Agree").unwrap()), vec!["0000-0003-0315-7727"]);
    }

    #[test]
    fn publication_numbers_are_not_orcids() {
        assert!(extract_orcids("NA [1, 2]").is_empty());
        assert_eq!(
            extract_orcids("[0000-0002-1825-009X](u) [0000-0003-4379-8967](v)"),
            vec!["0000-0002-1825-009X", "0000-0003-4379-8967"]
        );
    }

    #[test]
    fn missing_section_is_an_error() {
        assert!(parse_configurations("# Publications\n").is_err());
    }
}
