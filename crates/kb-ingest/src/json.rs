//! JSON inputs: rule files and `.zenodo.json` metadata.

use std::path::Path;

use kb_model::RuleSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};
use crate::table::read_text;

/// Deserialize a JSON file into `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| IngestError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a validation rule file. Unknown keys are an error.
pub fn load_rule_set(path: &Path) -> Result<RuleSet> {
    let rules: RuleSet = read_json(path)?;
    tracing::debug!(
        path = %path.display(),
        required = rules.required_columns.len(),
        optional = rules.optional_columns.len(),
        "loaded rule set"
    );
    Ok(rules)
}

/// One entry of the `creators` list in `.zenodo.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default)]
    pub orcid: String,
}

/// The parts of `.zenodo.json` used outside of its own validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZenodoMetadata {
    #[serde(default)]
    pub creators: Vec<Creator>,
}

impl ZenodoMetadata {
    /// Trimmed creator ORCIDs in file order.
    pub fn orcids(&self) -> Vec<String> {
        self.creators
            .iter()
            .map(|creator| creator.orcid.trim().to_string())
            .collect()
    }
}

pub fn load_zenodo(path: &Path) -> Result<ZenodoMetadata> {
    read_json(path)
}
