//! Shared types for knowledge-base validation and conversion.
//!
//! - [`Table`]: a loaded CSV table with trimmed string cells.
//! - [`RuleSet`]: declarative column rules read from a JSON file.
//! - [`ValidationReport`]: ordered violations produced by the validators.

pub mod naming;
pub mod report;
pub mod rules;
pub mod table;

pub use naming::{NOT_APPLICABLE, orcid_link, orcid_url, supporting_dir_name};
pub use report::{RowRef, ValidationReport, Violation, ViolationCategory, ViolationKind};
pub use rules::{DOI_RESOLVER, LinkColumn, LinkKind, RuleSet};
pub use table::{MULTI_VALUE_SEPARATOR, RowView, Table, spreadsheet_line, split_multi};
