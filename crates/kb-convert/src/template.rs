//! Markdown templates with `{token}` placeholders.
//!
//! Substitution is a single left-to-right pass over the template text: a
//! placeholder is replaced only when the exact `{token}` string is one of the
//! supplied tokens. Every other brace, including `{` inside substituted
//! values, is copied through unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    text: String,
}

impl Template {
    /// Read a template file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = kb_ingest::read_text(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ConvertError::TemplateName {
                path: path.to_path_buf(),
            })?;
        Ok(Self::from_text(name, text))
    }

    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output file name: the template name without its last extension
    /// (`videos.md.in` becomes `videos.md`).
    pub fn output_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) if idx > 0 => &self.name[..idx],
            _ => &self.name,
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.text.contains(&placeholder(token))
    }

    /// Replace every listed token. Each token must occur in the template.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String> {
        self.render_with_optional(values, &[])
    }

    /// Like [`Template::render`], but tokens in `optional` may be absent.
    pub fn render_with_optional(
        &self,
        required: &[(&str, &str)],
        optional: &[(&str, &str)],
    ) -> Result<String> {
        if let Some((token, _)) = required.iter().find(|(token, _)| !self.contains(token)) {
            return Err(ConvertError::MissingPlaceholder {
                template: self.name.clone(),
                token: (*token).to_string(),
            });
        }
        let replacements: Vec<(String, &str)> = required
            .iter()
            .chain(optional)
            .map(|(token, value)| (placeholder(token), *value))
            .collect();
        Ok(substitute(&self.text, &replacements))
    }
}

fn placeholder(token: &str) -> String {
    format!("{{{token}}}")
}

fn substitute(text: &str, replacements: &[(String, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        match replacements
            .iter()
            .find(|(token, _)| rest.starts_with(token.as_str()))
        {
            Some((token, value)) => {
                out.push_str(value);
                rest = &rest[token.len()..];
            }
            None => {
                out.push('{');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Write rendered output into `output_dir`, creating the directory if needed.
pub fn write_output(output_dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|source| ConvertError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let path = output_dir.join(file_name);
    fs::write(&path, contents).map_err(|source| ConvertError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote markdown");
    Ok(path)
}
