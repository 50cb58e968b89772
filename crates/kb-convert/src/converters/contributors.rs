//! Contributor list for `thewho.md`, generated from `.zenodo.json`.

use std::path::{Path, PathBuf};

use kb_ingest::ZenodoMetadata;
use kb_model::orcid_link;

use super::write_page;
use crate::error::Result;
use crate::template::Template;

pub const CONTRIBUTORS_TOKEN: &str = "contributor_list";

/// Numbered markdown list in creator order. Every item uses `1.` and lets the
/// renderer number them.
pub fn contributor_list(metadata: &ZenodoMetadata) -> String {
    metadata
        .creators
        .iter()
        .map(|creator| {
            format!(
                "1. {}, {}, {}.",
                creator.name,
                creator.affiliation,
                orcid_link(creator.orcid.trim())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_contributors(template: &Template, metadata: &ZenodoMetadata) -> Result<String> {
    template.render(&[(CONTRIBUTORS_TOKEN, &contributor_list(metadata))])
}

pub fn write_contributors_md(
    template_path: &Path,
    zenodo_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let template = Template::load(template_path)?;
    let metadata = kb_ingest::load_zenodo(zenodo_path)?;
    let rendered = render_contributors(&template, &metadata)?;
    write_page(&template, output_dir, &rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_ingest::Creator;

    #[test]
    fn creators_become_list_items() {
        let metadata = ZenodoMetadata {
            creators: vec![
                Creator {
                    name: "Yaniv, Ziv".to_string(),
                    affiliation: "NIAID".to_string(),
                    orcid: "0000-0003-0315-7727".to_string(),
                },
                Creator {
                    name: "Radtke, Andrea J.".to_string(),
                    affiliation: "NIAID".to_string(),
                    orcid: " 0000-0003-4379-8967".to_string(),
                },
            ],
        };
        insta::assert_snapshot!(contributor_list(&metadata), @r"
        1. Yaniv, Ziv, NIAID, [0000-0003-0315-7727](https://orcid.org/0000-0003-0315-7727).
        1. Radtke, Andrea J., NIAID, [0000-0003-4379-8967](https://orcid.org/0000-0003-4379-8967).
        ");
    }
}
