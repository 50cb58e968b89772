//! Validators for particular knowledge-base files.

mod bib;
mod images;
mod probes;
mod reagents;
mod supporting;
mod videos;
mod zenodo;

pub use bib::{BibEntry, BibSyntaxError, parse_bibtex, validate_bibtex};
pub use images::{md5_hex, validate_images};
pub use probes::{PROBE_COLUMN, validate_probes};
pub use reagents::{MAX_ORCID_ENTRIES, ReagentContext, validate_reagents};
pub use supporting::{CONFIGURATIONS_HEADING, extract_orcids, parse_configurations};
pub use videos::validate_videos;
pub use zenodo::{CreatorOrder, validate_zenodo};
