//! Declarative rule set describing which checks apply to which columns.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Resolver prefix used to turn a DOI into a URL.
pub const DOI_RESOLVER: &str = "https://doi.org/";

/// Validation rules for one CSV file, usually loaded from a JSON file.
///
/// Key names follow the knowledge-base configuration files; the older key
/// names are accepted as aliases. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    /// Columns that must be non-empty in every row.
    #[serde(alias = "data_required_column_names")]
    pub required_columns: Vec<String>,

    /// Columns that may be empty. Together with `required_columns` these list
    /// every column of the table.
    #[serde(default, alias = "data_optional_column_names")]
    pub optional_columns: Vec<String>,

    /// Columns whose non-empty values must be distinct across rows.
    #[serde(default, alias = "unique_single_value_columns")]
    pub unique_columns: Vec<String>,

    /// Multi-value columns that must not repeat a value inside one cell.
    #[serde(default, alias = "unique_multi_value_columns")]
    pub unique_within_cell_columns: Vec<String>,

    #[serde(default, alias = "url_columns")]
    pub single_url_columns: Vec<String>,

    #[serde(default)]
    pub multi_url_columns: Vec<String>,

    #[serde(default, alias = "doi_columns")]
    pub single_doi_columns: Vec<String>,

    #[serde(default)]
    pub multi_doi_columns: Vec<String>,

    /// Column name -> allowed values, one value per cell.
    #[serde(default, alias = "column_is_in")]
    pub enum_columns: BTreeMap<String, Vec<String>>,

    /// Column name -> allowed values, `;`-separated values per cell.
    #[serde(default, alias = "multi_value_column_is_in")]
    pub multi_enum_columns: BTreeMap<String, Vec<String>>,

    /// Whether link checks follow HTTP redirects.
    #[serde(default = "default_allow_redirects")]
    pub allow_redirects: bool,
}

fn default_allow_redirects() -> bool {
    true
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            required_columns: Vec::new(),
            optional_columns: Vec::new(),
            unique_columns: Vec::new(),
            unique_within_cell_columns: Vec::new(),
            single_url_columns: Vec::new(),
            multi_url_columns: Vec::new(),
            single_doi_columns: Vec::new(),
            multi_doi_columns: Vec::new(),
            enum_columns: BTreeMap::new(),
            multi_enum_columns: BTreeMap::new(),
            allow_redirects: default_allow_redirects(),
        }
    }
}

/// How a link column's values are turned into URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Url,
    Doi,
}

/// A column whose values are checked for reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkColumn<'a> {
    pub column: &'a str,
    pub kind: LinkKind,
    pub multi_value: bool,
}

impl LinkColumn<'_> {
    /// Build the URL to check for one value of this column.
    pub fn target(&self, value: &str) -> String {
        match self.kind {
            LinkKind::Url => value.to_string(),
            LinkKind::Doi => format!("{DOI_RESOLVER}{value}"),
        }
    }
}

impl RuleSet {
    /// Create a rule set that only declares the column partition.
    pub fn with_columns<R, O>(required: R, optional: O) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            required_columns: required.into_iter().map(Into::into).collect(),
            optional_columns: optional.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Union of required and optional columns.
    pub fn declared_columns(&self) -> BTreeSet<&str> {
        self.required_columns
            .iter()
            .chain(&self.optional_columns)
            .map(String::as_str)
            .collect()
    }

    /// Columns listed as both required and optional, in required order.
    pub fn overlapping_columns(&self) -> Vec<&str> {
        let optional: BTreeSet<&str> = self.optional_columns.iter().map(String::as_str).collect();
        let mut seen = BTreeSet::new();
        self.required_columns
            .iter()
            .map(String::as_str)
            .filter(|column| optional.contains(column) && seen.insert(*column))
            .collect()
    }

    /// Every `(rule name, column)` pair referenced by a per-column rule.
    pub fn referenced_columns(&self) -> Vec<(&'static str, &str)> {
        let mut refs = Vec::new();
        let lists: [(&'static str, &Vec<String>); 6] = [
            ("unique_columns", &self.unique_columns),
            ("unique_within_cell_columns", &self.unique_within_cell_columns),
            ("single_url_columns", &self.single_url_columns),
            ("multi_url_columns", &self.multi_url_columns),
            ("single_doi_columns", &self.single_doi_columns),
            ("multi_doi_columns", &self.multi_doi_columns),
        ];
        for (rule, columns) in lists {
            refs.extend(columns.iter().map(|column| (rule, column.as_str())));
        }
        refs.extend(self.enum_columns.keys().map(|c| ("enum_columns", c.as_str())));
        refs.extend(
            self.multi_enum_columns
                .keys()
                .map(|c| ("multi_enum_columns", c.as_str())),
        );
        refs
    }

    /// Link columns in declaration order: single URL, multi URL, single DOI, multi DOI.
    pub fn link_columns(&self) -> Vec<LinkColumn<'_>> {
        let groups = [
            (&self.single_url_columns, LinkKind::Url, false),
            (&self.multi_url_columns, LinkKind::Url, true),
            (&self.single_doi_columns, LinkKind::Doi, false),
            (&self.multi_doi_columns, LinkKind::Doi, true),
        ];
        groups
            .into_iter()
            .flat_map(|(columns, kind, multi_value)| {
                columns.iter().map(move |column| LinkColumn {
                    column: column.as_str(),
                    kind,
                    multi_value,
                })
            })
            .collect()
    }

    pub fn has_link_columns(&self) -> bool {
        !(self.single_url_columns.is_empty()
            && self.multi_url_columns.is_empty()
            && self.single_doi_columns.is_empty()
            && self.multi_doi_columns.is_empty())
    }

    /// Set (or replace) the allowed values of a single-value column.
    pub fn set_enum<I>(&mut self, column: impl Into<String>, allowed: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.enum_columns
            .insert(column.into(), allowed.into_iter().map(Into::into).collect());
    }

    /// Set (or replace) the allowed values of a multi-value column.
    pub fn set_multi_enum<I>(&mut self, column: impl Into<String>, allowed: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.multi_enum_columns
            .insert(column.into(), allowed.into_iter().map(Into::into).collect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_columns_are_reported_once() {
        let mut rules = RuleSet::with_columns(["A", "B", "A"], ["A", "C"]);
        rules.optional_columns.push("B".to_string());
        assert_eq!(rules.overlapping_columns(), vec!["A", "B"]);
    }

    #[test]
    fn link_columns_follow_declaration_groups() {
        let rules = RuleSet {
            multi_doi_columns: vec!["DOIs".to_string()],
            single_url_columns: vec!["URL".to_string()],
            ..RuleSet::default()
        };
        let links = rules.link_columns();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].column, "URL");
        assert_eq!(links[1].target("10.1/x"), "https://doi.org/10.1/x");
        assert!(links[1].multi_value);
    }

    #[test]
    fn allow_redirects_defaults_to_true() {
        assert!(RuleSet::default().allow_redirects);
    }
}
