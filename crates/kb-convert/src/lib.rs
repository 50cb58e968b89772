//! Markdown generation for the knowledge-base web site.
//!
//! # Features
//!
//! - **Templates**: literal `{token}` substitution; other braces pass through
//! - **Tables**: left-aligned pipe tables and collapsible detail blocks
//! - **Reagent resources**: the reagent table with supporting-material,
//!   UniProt and vendor links
//! - **Pages**: protocols, videos, fluorescent probes, datasets and software,
//!   contributors, data dictionary and glossary, landing-page counters
//! - **Supporting material**: per reagent and ORCID pages from a batch CSV
//!
//! Every converter renders in memory and writes its output only once the
//! whole page rendered.

pub mod converters;
mod error;
mod markdown;
mod template;

// === Error Types ===
pub use error::{ConvertError, Result};

// === Templates ===
pub use template::{Template, write_output};

// === Markdown ===
pub use markdown::{SUMMARY_WORDS, details, doi_links, link, pipe_table};

// === Converters ===
pub use converters::contributors::{contributor_list, render_contributors, write_contributors_md};
pub use converters::data_software::{
    dataset_table, render_data_software, software_table, write_data_software_md,
};
pub use converters::glossary::{render_contrib, write_contrib_md};
pub use converters::index_stats::{IndexStats, render_index, write_index_md};
pub use converters::probes::{render_probes, sorted_probes, write_probes_md};
pub use converters::protocols::{protocols_table, render_protocols, write_protocols_md};
pub use converters::reagent_resources::{
    ReagentLinking, load_vendor_sites, orcid_page_links, reagent_resources_table,
    render_reagent_resources, write_reagent_resources_md,
};
pub use converters::supporting::{
    SupportingPage, load_publications, render_supporting_pages, write_supporting_md,
};
pub use converters::videos::{render_videos, video_tables, write_videos_md};
