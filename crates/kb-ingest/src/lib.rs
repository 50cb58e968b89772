//! Knowledge-base file loading.
//!
//! # Features
//!
//! - **CSV Loading**: UTF-8 (with or without BOM) and Windows-1252 tables,
//!   trimmed cells, padded short rows
//! - **Rule Files**: JSON [`RuleSet`](kb_model::RuleSet) files, legacy key names accepted
//! - **Zenodo Metadata**: creator names, affiliations and ORCIDs
//! - **Discovery**: recursive listing of supporting-material files

mod discovery;
mod error;
mod json;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use table::{parse_table, read_column_values, read_table, read_table_with_columns, read_text};

// === JSON Reading ===
pub use json::{Creator, ZenodoMetadata, load_rule_set, load_zenodo, read_json};

// === File Discovery ===
pub use discovery::{has_extension, list_files_recursive, list_files_with_extension};
