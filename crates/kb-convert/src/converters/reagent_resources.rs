//! `reagent_resources.md` from `reagent_resources.csv`.
//!
//! Rows are sorted by target, ignoring case. ORCIDs in `Agree`/`Disagree`
//! link to their supporting-material pages, UniProt accessions to UniProtKB
//! and vendor names to the sites listed in the vendors file. The page is
//! written to the parent of the supporting-material directory.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use kb_model::{NOT_APPLICABLE, Table, split_multi, supporting_dir_name};
use kb_validate::{LinkCheckOptions, LinkChecker, LinkStatus, check_all};

use super::{require_columns, write_page};
use crate::error::{ConvertError, Result};
use crate::markdown::{link, pipe_table};
use crate::template::Template;

pub const REAGENT_RESOURCES_TOKEN: &str = "reagent_resources_table";

const TARGET: &str = "Target Name / Protein Biomarker";
const CONJUGATE: &str = "Conjugate";
const AGREE: &str = "Agree";
const DISAGREE: &str = "Disagree";
const UNIPROT: &str = "UniProt Accession Number";
const VENDOR: &str = "Vendor";
const VENDOR_URL: &str = "URL";

const UNIPROT_ENTRY_URL: &str = "https://www.uniprot.org/uniprotkb/";
/// The entry page answers 200 for unknown accessions; the REST endpoint does not.
const UNIPROT_REST_URL: &str = "https://rest.uniprot.org/uniprotkb/";

/// How reagent cells are turned into links.
pub struct ReagentLinking<'a> {
    /// Vendor name to web site.
    pub vendor_sites: &'a BTreeMap<String, String>,
    /// Name of the supporting-material directory, as seen from the page.
    pub supporting_dir: &'a str,
    /// Confirms UniProt accessions and vendor sites. Without one every
    /// accession and site is linked unchecked.
    pub checker: Option<&'a dyn LinkChecker>,
    pub options: &'a LinkCheckOptions,
}

/// Links to the supporting pages of each ORCID in an `Agree`/`Disagree` cell.
pub fn orcid_page_links(cell: &str, target: &str, conjugate: &str, supporting_dir: &str) -> String {
    if cell == NOT_APPLICABLE {
        return NOT_APPLICABLE.to_string();
    }
    let pair_dir = supporting_dir_name(target, conjugate);
    split_multi(cell)
        .map(|orcid| link(orcid, &format!("{supporting_dir}/{pair_dir}/{orcid}.md")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Markdown for every distinct accession in the table.
///
/// An accession UniProt reports as unknown stays plain text. One that could
/// not be checked is linked anyway.
fn uniprot_markdown(table: &Table, linking: &ReagentLinking<'_>) -> BTreeMap<String, String> {
    let accessions: Vec<String> = table
        .iter_rows()
        .flat_map(|row| split_multi(row.get(UNIPROT)))
        .filter(|accession| *accession != NOT_APPLICABLE)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let statuses = match linking.checker {
        Some(checker) => {
            let urls: Vec<String> = accessions
                .iter()
                .map(|accession| format!("{UNIPROT_REST_URL}{accession}.txt"))
                .collect();
            check_all(checker, &urls, linking.options)
        }
        None => vec![LinkStatus::Reachable; accessions.len()],
    };

    let mut markdown = BTreeMap::new();
    markdown.insert(NOT_APPLICABLE.to_string(), NOT_APPLICABLE.to_string());
    for (accession, status) in accessions.into_iter().zip(statuses) {
        let entry_link = link(&accession, &format!("{UNIPROT_ENTRY_URL}{accession}"));
        let text = match status {
            LinkStatus::Reachable => entry_link,
            LinkStatus::NotFound { code } => {
                tracing::warn!(%accession, code, "UniProt does not know accession, not linking");
                accession.clone()
            }
            LinkStatus::Unreachable { reason } => {
                tracing::warn!(
                    %accession,
                    %reason,
                    "could not check UniProt accession, check link"
                );
                entry_link
            }
        };
        markdown.insert(accession, text);
    }
    markdown
}

fn uniprot_cell(cell: &str, markdown: &BTreeMap<String, String>) -> String {
    split_multi(cell)
        .map(|accession| markdown.get(accession).map_or(accession, String::as_str))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Vendor links. Unreachable sites are linked anyway, with a warning.
fn vendor_markdown(linking: &ReagentLinking<'_>) -> BTreeMap<String, String> {
    if let Some(checker) = linking.checker {
        let urls: Vec<String> = linking.vendor_sites.values().cloned().collect();
        let statuses = check_all(checker, &urls, linking.options);
        for ((vendor, url), status) in linking.vendor_sites.iter().zip(statuses) {
            if !status.is_reachable() {
                tracing::warn!(%vendor, %url, ?status, "problem with vendor site, check link");
            }
        }
    }
    linking
        .vendor_sites
        .iter()
        .map(|(vendor, url)| (vendor.clone(), link(vendor, url)))
        .collect()
}

/// The reagent table with rows sorted by target and cells linked.
pub fn reagent_resources_table(table: &Table, linking: &ReagentLinking<'_>) -> Result<Table> {
    require_columns(
        table,
        &[TARGET, CONJUGATE, AGREE, DISAGREE, UNIPROT, VENDOR],
        "reagent resources table",
    )?;
    let mut rows: Vec<_> = table.iter_rows().collect();
    rows.sort_by_cached_key(|row| row.get(TARGET).to_lowercase());

    let mut linked = Table::new(table.headers.clone());
    if rows.is_empty() {
        return Ok(linked);
    }

    let uniprot = uniprot_markdown(table, linking);
    let vendors = vendor_markdown(linking);
    for row in rows {
        let (target, conjugate) = (row.get(TARGET), row.get(CONJUGATE));
        let mut cells = Vec::with_capacity(table.headers.len());
        for header in &table.headers {
            let value = row.get(header);
            let cell = match header.as_str() {
                AGREE | DISAGREE => {
                    orcid_page_links(value, target, conjugate, linking.supporting_dir)
                }
                UNIPROT => uniprot_cell(value, &uniprot),
                VENDOR => match vendors.get(value) {
                    Some(markdown) => markdown.clone(),
                    None => {
                        return Err(ConvertError::UnknownVendor {
                            vendor: value.to_string(),
                        });
                    }
                },
                _ => value.to_string(),
            };
            cells.push(cell);
        }
        linked.push_row(cells);
    }
    Ok(linked)
}

pub fn render_reagent_resources(
    template: &Template,
    table: &Table,
    linking: &ReagentLinking<'_>,
) -> Result<String> {
    let rendered = pipe_table(&reagent_resources_table(table, linking)?);
    template.render(&[(REAGENT_RESOURCES_TOKEN, &rendered)])
}

/// Vendor name to web site, from a CSV with `Vendor` and `URL` columns.
///
/// A vendor listed twice keeps its last site.
pub fn load_vendor_sites(path: &Path) -> Result<BTreeMap<String, String>> {
    let table = kb_ingest::read_table_with_columns(path, &[VENDOR, VENDOR_URL])?;
    Ok(table
        .iter_rows()
        .map(|row| (row.get(VENDOR).to_string(), row.get(VENDOR_URL).to_string()))
        .collect())
}

/// Generate the reagent resources page next to `supporting_root`.
pub fn write_reagent_resources_md(
    template_path: &Path,
    csv_path: &Path,
    vendors_path: &Path,
    supporting_root: &Path,
    checker: Option<&dyn LinkChecker>,
    options: &LinkCheckOptions,
) -> Result<PathBuf> {
    let template = Template::load(template_path)?;
    let table = kb_ingest::read_table(csv_path)?;
    let vendor_sites = load_vendor_sites(vendors_path)?;
    let supporting_dir = supporting_root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ConvertError::TemplateName {
            path: supporting_root.to_path_buf(),
        })?;
    let linking = ReagentLinking {
        vendor_sites: &vendor_sites,
        supporting_dir: &supporting_dir,
        checker,
        options,
    };
    let rendered = render_reagent_resources(&template, &table, &linking)?;
    let output_dir = supporting_root.parent().unwrap_or_else(|| Path::new("."));
    write_page(&template, output_dir, &rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS: [&str; 7] = [TARGET, CONJUGATE, "Clone", UNIPROT, VENDOR, AGREE, DISAGREE];

    fn vendor_sites() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Abcam".to_string(), "https://www.abcam.com".to_string()),
            ("BioLegend".to_string(), "https://www.biolegend.com".to_string()),
        ])
    }

    fn table() -> Table {
        Table::from_rows(
            HEADERS,
            [
                ["CD4", "AF647", "RPA-T4", "P01730", "Abcam", "0000-0001", "NA"],
                ["cd3", "AF488", "UCHT1", "P07766; NA", "BioLegend", "0000-0001; 0000-0002", "NA"],
            ],
        )
    }

    #[test]
    fn orcids_link_to_supporting_pages() {
        assert_eq!(
            orcid_page_links("A; B", "CD3 (T)", "AF488", "supporting_material"),
            "[A](supporting_material/CD3__T__AF488/A.md), \
             [B](supporting_material/CD3__T__AF488/B.md)"
        );
        assert_eq!(orcid_page_links("NA", "CD3", "AF488", "supporting_material"), "NA");
    }

    #[test]
    fn rows_sorted_by_target_ignoring_case() {
        let sites = vendor_sites();
        let options = LinkCheckOptions::default();
        let linking = ReagentLinking {
            vendor_sites: &sites,
            supporting_dir: "supporting_material",
            checker: None,
            options: &options,
        };
        let linked = reagent_resources_table(&table(), &linking).unwrap();
        assert_eq!(linked.value(0, TARGET), Some("cd3"));
        assert_eq!(linked.value(1, TARGET), Some("CD4"));
        assert_eq!(
            linked.value(0, UNIPROT),
            Some("[P07766](https://www.uniprot.org/uniprotkb/P07766), NA")
        );
        assert_eq!(
            linked.value(0, VENDOR),
            Some("[BioLegend](https://www.biolegend.com)")
        );
        assert_eq!(linked.value(1, DISAGREE), Some("NA"));
    }

    #[test]
    fn unknown_accession_stays_plain() {
        let sites = vendor_sites();
        let options = LinkCheckOptions {
            workers: 1,
            ..LinkCheckOptions::default()
        };
        let checker = |url: &str| {
            if url.contains("P01730") {
                LinkStatus::NotFound { code: 404 }
            } else if url.contains("P07766") {
                LinkStatus::Unreachable {
                    reason: "timeout".to_string(),
                }
            } else {
                LinkStatus::NotFound { code: 500 }
            }
        };
        let linking = ReagentLinking {
            vendor_sites: &sites,
            supporting_dir: "supporting_material",
            checker: Some(&checker),
            options: &options,
        };
        let linked = reagent_resources_table(&table(), &linking).unwrap();
        assert_eq!(linked.value(1, UNIPROT), Some("P01730"));
        assert_eq!(
            linked.value(0, UNIPROT),
            Some("[P07766](https://www.uniprot.org/uniprotkb/P07766), NA")
        );
        // Vendor sites are linked even when the check fails.
        assert_eq!(linked.value(1, VENDOR), Some("[Abcam](https://www.abcam.com)"));
    }

    #[test]
    fn unknown_vendor_is_an_error() {
        let sites = BTreeMap::new();
        let options = LinkCheckOptions::default();
        let linking = ReagentLinking {
            vendor_sites: &sites,
            supporting_dir: "supporting_material",
            checker: None,
            options: &options,
        };
        let err = reagent_resources_table(&table(), &linking).unwrap_err();
        assert!(matches!(err, ConvertError::UnknownVendor { ref vendor } if vendor == "BioLegend"));
    }
}
