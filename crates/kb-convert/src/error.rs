//! Error types for markdown generation.

use std::path::PathBuf;

use kb_ingest::IngestError;
use thiserror::Error;

/// Errors raised by the converters.
///
/// Any of these aborts the conversion before an output file is written.
#[derive(Debug, Error)]
pub enum ConvertError {
    // === Input Errors ===
    /// Reading a CSV, JSON or template file failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// The input table lacks a column the converter needs.
    #[error("column '{column}' not found in {source_name}")]
    MissingColumn { column: String, source_name: String },

    /// A cell could not be interpreted.
    #[error("invalid {column} on line {line}: '{value}'")]
    InvalidValue {
        column: String,
        line: usize,
        value: String,
    },

    /// A reagent names a vendor missing from the vendors file.
    #[error("vendor '{vendor}' not found in the vendors file")]
    UnknownVendor { vendor: String },

    /// Supporting-material batch rows must name exactly one ORCID.
    #[error(
        "rows must contain exactly one ORCID across Agree/Disagree, offending lines: {lines:?}"
    )]
    OrcidCount { lines: Vec<usize> },

    // === Template Errors ===
    /// A required `{token}` does not occur in the template.
    #[error("template {template} does not contain placeholder {{{token}}}")]
    MissingPlaceholder { template: String, token: String },

    /// The template path has no file name to derive the output name from.
    #[error("cannot derive an output file name from template {path}")]
    TemplateName { path: PathBuf },

    // === Output Errors ===
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for conversions.
pub type Result<T> = std::result::Result<T, ConvertError>;
