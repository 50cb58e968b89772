//! Rule-driven validation of knowledge-base inputs.
//!
//! The generic table validator ([`validate_table`]) checks a CSV table against
//! a [`RuleSet`](kb_model::RuleSet): column coverage, required values,
//! uniqueness, allowed values and link reachability. The specialized
//! validators in [`specialized`] build on it for particular KB files and add
//! cross-file checks; BibTeX and `.zenodo.json` have validators of their own.

pub mod checks;
pub mod link;
mod pipeline;
pub mod specialized;

pub use checks::{validate_links, validate_membership, validate_schema, validate_uniqueness};
pub use link::{
    BROWSER_USER_AGENT, HttpLinkChecker, LinkCheckOptions, LinkChecker, LinkError, LinkStatus,
    check_all,
};
pub use pipeline::validate_table;
pub use specialized::{
    CreatorOrder, ReagentContext, parse_bibtex, validate_bibtex, validate_images,
    validate_probes, validate_reagents, validate_videos, validate_zenodo,
};
