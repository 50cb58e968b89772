//! `videos.csv`: contributor ORCIDs must belong to `.zenodo.json` creators.

use kb_model::{RuleSet, Table, ValidationReport};

use crate::link::{LinkCheckOptions, LinkChecker};
use crate::pipeline::validate_table;

/// Column listing the ORCIDs of a video's contributors.
const CONTRIBUTORS_COLUMN: &str = "Contributors";

/// Validate `videos.csv`: the generic rules plus `Contributors` restricted to
/// the creator ORCIDs of `.zenodo.json`.
pub fn validate_videos(
    table: &Table,
    rules: &RuleSet,
    creator_orcids: &[String],
    checker: Option<&dyn LinkChecker>,
    options: &LinkCheckOptions,
) -> ValidationReport {
    let mut rules = rules.clone();
    rules.set_multi_enum(CONTRIBUTORS_COLUMN, creator_orcids.iter().cloned());
    validate_table(table, &rules, checker, options)
}
