//! `contrib.md`: the reagent data dictionary and the glossary, rendered verbatim.

use std::path::{Path, PathBuf};

use kb_model::Table;

use super::write_page;
use crate::error::Result;
use crate::markdown::pipe_table;
use crate::template::Template;

pub const METADATA_TOKEN: &str = "reagent_metadata_table";
pub const GLOSSARY_TOKEN: &str = "glossary_table";

pub fn render_contrib(
    template: &Template,
    data_dictionary: &Table,
    glossary: &Table,
) -> Result<String> {
    let metadata = pipe_table(data_dictionary);
    let glossary = pipe_table(glossary);
    template.render(&[(METADATA_TOKEN, &metadata), (GLOSSARY_TOKEN, &glossary)])
}

/// Both CSV files are commonly spreadsheet exports in Windows-1252, which the
/// table reader handles.
pub fn write_contrib_md(
    template_path: &Path,
    data_dictionary_path: &Path,
    glossary_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let template = Template::load(template_path)?;
    let data_dictionary = kb_ingest::read_table(data_dictionary_path)?;
    let glossary = kb_ingest::read_table(glossary_path)?;
    let rendered = render_contrib(&template, &data_dictionary, &glossary)?;
    write_page(&template, output_dir, &rendered)
}
