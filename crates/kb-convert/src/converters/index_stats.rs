//! Counters shown on the knowledge-base landing page.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use kb_model::{NOT_APPLICABLE, Table, split_multi};

use super::{require_columns, write_page};
use crate::error::Result;
use crate::template::Template;

/// Conjugates that are not fluorescent probes.
pub const NON_FLUORESCENT_CONJUGATES: [&str; 8] = [
    "NA",
    "Unconjugated",
    "Biotin",
    "HRP",
    "UT014",
    "UT015",
    "UT016",
    "UT019",
];

const COLUMNS: [&str; 6] = [
    "Agree",
    "Disagree",
    "Conjugate",
    "Target Species",
    "Target Tissue",
    "Tissue State",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub contributors: usize,
    pub validated_reagents: usize,
    pub fluorescent_probes: usize,
    pub tissues: usize,
}

impl IndexStats {
    /// Compute the counters from `reagent_resources.csv`.
    pub fn from_reagents(table: &Table) -> Result<Self> {
        require_columns(table, &COLUMNS, "reagent resources table")?;

        let contributors: BTreeSet<&str> = table
            .iter_rows()
            .flat_map(|row| split_multi(row.get("Agree")).chain(split_multi(row.get("Disagree"))))
            .filter(|orcid| *orcid != NOT_APPLICABLE)
            .collect();
        let probes: BTreeSet<&str> = table
            .iter_rows()
            .map(|row| row.get("Conjugate"))
            .filter(|conjugate| !NON_FLUORESCENT_CONJUGATES.contains(conjugate))
            .collect();
        let tissues: BTreeSet<(&str, &str, &str)> = table
            .iter_rows()
            .map(|row| {
                (
                    row.get("Target Species"),
                    row.get("Target Tissue"),
                    row.get("Tissue State"),
                )
            })
            .collect();

        Ok(Self {
            contributors: contributors.len(),
            validated_reagents: table.len(),
            fluorescent_probes: probes.len(),
            tissues: tissues.len(),
        })
    }

    pub fn substitutions(&self) -> [(&'static str, String); 4] {
        [
            ("number_of_contributors", self.contributors.to_string()),
            ("number_of_validated_reagents", self.validated_reagents.to_string()),
            ("number_of_fluorescent_probes", self.fluorescent_probes.to_string()),
            ("number_of_tissues", self.tissues.to_string()),
        ]
    }
}

/// Fill whichever counters the template mentions.
pub fn render_index(template: &Template, stats: &IndexStats) -> Result<String> {
    let values = stats.substitutions();
    let values: Vec<(&str, &str)> = values
        .iter()
        .map(|(token, value)| (*token, value.as_str()))
        .collect();
    template.render_with_optional(&[], &values)
}

pub fn write_index_md(
    template_path: &Path,
    reagents_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let template = Template::load(template_path)?;
    let table = kb_ingest::read_table(reagents_path)?;
    let stats = IndexStats::from_reagents(&table)?;
    tracing::debug!(?stats, "computed index statistics");
    let rendered = render_index(&template, &stats)?;
    write_page(&template, output_dir, &rendered)
}
