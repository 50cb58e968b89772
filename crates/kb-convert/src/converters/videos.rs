//! `videos.md` from `videos.csv`: general and tutorial tables, newest first.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use kb_model::{RowView, Table, spreadsheet_line};

use super::{require_columns, write_page};
use crate::error::{ConvertError, Result};
use crate::markdown::{details, pipe_table};
use crate::template::Template;

pub const GENERAL_TOKEN: &str = "general_table";
pub const TUTORIAL_TOKEN: &str = "tutorial_table";

const COLUMNS: [&str; 7] = ["Title", "URL", "Details", "Category", "Year", "Month", "Day"];

/// Publication date of a video row.
fn video_date(row: RowView<'_>, index: usize) -> Result<NaiveDate> {
    let (year, month, day) = (row.get("Year"), row.get("Month"), row.get("Day"));
    let invalid = || ConvertError::InvalidValue {
        column: "date".to_string(),
        line: spreadsheet_line(index),
        value: format!("{year}-{month}-{day}"),
    };
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Split the videos table by category. Both tables are sorted by date, newest
/// first; videos from the same day keep their file order.
pub fn video_tables(table: &Table) -> Result<(Table, Table)> {
    require_columns(table, &COLUMNS, "videos table")?;
    let mut dated = table
        .iter_rows()
        .enumerate()
        .map(|(index, row)| video_date(row, index).map(|date| (date, row)))
        .collect::<Result<Vec<_>>>()?;
    dated.sort_by(|(a, _), (b, _)| b.cmp(a));

    let category_table = |category: &str| {
        let rows = dated
            .iter()
            .filter(|(_, row)| row.get("Category") == category)
            .map(|(_, row)| {
                [
                    format!("{} [[video]({})].", row.get("Title"), row.get("URL")),
                    details(row.get("Details")),
                ]
            });
        Table::from_rows(["Title", "Details"], rows)
    };
    Ok((category_table("general"), category_table("tutorial")))
}

pub fn render_videos(template: &Template, table: &Table) -> Result<String> {
    let (general, tutorial) = video_tables(table)?;
    let general = pipe_table(&general);
    let tutorial = pipe_table(&tutorial);
    template.render(&[(GENERAL_TOKEN, &general), (TUTORIAL_TOKEN, &tutorial)])
}

pub fn write_videos_md(
    template_path: &Path,
    csv_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let template = Template::load(template_path)?;
    let table = kb_ingest::read_table(csv_path)?;
    let rendered = render_videos(&template, &table)?;
    write_page(&template, output_dir, &rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn videos() -> Table {
        Table::from_rows(
            COLUMNS,
            [
                ["Old", "https://v/1", "", "general", "2021", "3", "1"],
                ["Intro", "https://v/2", "", "tutorial", "2022", "1", "15"],
                ["New", "https://v/3", "", "general", "2023", "12", "31"],
                ["Same day", "https://v/4", "", "general", "2021", "3", "1"],
            ],
        )
    }

    #[test]
    fn general_videos_are_newest_first() {
        let (general, tutorial) = video_tables(&videos()).unwrap();
        let titles: Vec<&str> = general.rows.iter().map(|row| row[0].as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "New [[video](https://v/3)].",
                "Old [[video](https://v/1)].",
                "Same day [[video](https://v/4)].",
            ]
        );
        assert_eq!(tutorial.len(), 1);
    }

    #[test]
    fn invalid_date_reports_line() {
        let mut table = videos();
        table.rows[2][5] = "13".to_string();
        let err = video_tables(&table).unwrap_err();
        assert_eq!(err.to_string(), "invalid date on line 4: '2023-13-31'");
    }

    #[test]
    fn both_placeholders_are_required() {
        let template = Template::from_text("videos.md.in", "{general_table}");
        assert!(matches!(
            render_videos(&template, &videos()),
            Err(ConvertError::MissingPlaceholder { .. })
        ));
    }
}
