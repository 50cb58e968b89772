//! In-memory representation of a knowledge-base CSV table.

/// Separator used by multi-value cells (`"A; B; C"`).
pub const MULTI_VALUE_SEPARATOR: char = ';';

/// A loaded CSV table: header row plus string cells.
///
/// Cells are stored already trimmed; an empty string means the value is absent.
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from string literals. Short rows are padded with empty cells.
    pub fn from_rows<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut table = Self::new(headers.into_iter().map(Into::into).collect());
        for row in rows {
            table.push_row(row.into_iter().map(Into::into).collect());
        }
        table
    }

    /// Append a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell value at `row` for the named column.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|cells| cells[idx].as_str())
    }

    /// All values of a column in row order.
    pub fn column_values(&self, column: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|cells| cells[idx].as_str()).collect())
    }

    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|cells| RowView {
            headers: &self.headers,
            cells,
        })
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(|cells| RowView {
            headers: &self.headers,
            cells,
        })
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> RowView<'a> {
    /// Value of the named column; empty string when the column does not exist.
    pub fn get(&self, column: &str) -> &'a str {
        self.headers
            .iter()
            .position(|header| header == column)
            .map(|idx| self.cells[idx].as_str())
            .unwrap_or("")
    }

    pub fn cells(&self) -> &'a [String] {
        self.cells
    }
}

/// Split a multi-value cell on `;`, trimming each part and dropping empty parts.
pub fn split_multi(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(MULTI_VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

/// Convert a zero-based data row index into the line number a spreadsheet shows
/// (header is line 1).
pub fn spreadsheet_line(row: usize) -> usize {
    row + 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_multi_trims_and_skips_empty_parts() {
        let parts: Vec<&str> = split_multi(" A; B ;;c ; ").collect();
        assert_eq!(parts, vec!["A", "B", "c"]);
    }

    #[test]
    fn rows_are_padded_to_header_width() {
        let table = Table::from_rows(["A", "B", "C"], [vec!["1"]]);
        assert_eq!(table.rows[0], vec!["1", "", ""]);
    }

    #[test]
    fn row_view_reads_by_name() {
        let table = Table::from_rows(["Name", "Target"], [["", "CD3"]]);
        let row = table.row(0).unwrap();
        assert_eq!(row.get("Target"), "CD3");
        assert_eq!(row.get("Missing"), "");
    }
}
