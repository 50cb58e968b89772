//! Naming conventions shared by validators and converters.

/// Characters that cannot appear in a supporting-material directory name.
const INVALID_PATH_CHARS: &[char] = &[
    ' ', '\t', '/', '\\', '{', '}', '[', ']', '(', ')', '<', '>', ':', '&',
];

/// ORCID value meaning "no contributor".
pub const NOT_APPLICABLE: &str = "NA";

const ORCID_BASE_URL: &str = "https://orcid.org/";

/// Directory name holding the supporting material of a (target, conjugate) pair.
///
/// `("CD3 (T cells)", "AF488")` becomes `CD3__T_cells__AF488`.
pub fn supporting_dir_name(target: &str, conjugate: &str) -> String {
    format!("{target}_{conjugate}")
        .chars()
        .map(|c| if INVALID_PATH_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

pub fn orcid_url(orcid: &str) -> String {
    format!("{ORCID_BASE_URL}{orcid}")
}

/// Markdown link to an ORCID profile: `[id](https://orcid.org/id)`.
pub fn orcid_link(orcid: &str) -> String {
    format!("[{orcid}]({})", orcid_url(orcid))
}
