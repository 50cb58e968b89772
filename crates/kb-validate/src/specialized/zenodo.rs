//! `.zenodo.json` validation.

use std::collections::{BTreeMap, HashMap};

use kb_model::{ValidationReport, Violation, ViolationKind, orcid_url};
use serde_json::{Map, Value};

use crate::checks::links::link_violation;
use crate::link::{LinkCheckOptions, LinkChecker, check_all};

/// Top-level keys and the JSON type each must have.
const EXPECTED_KEYS: &[(&str, JsonType)] = &[
    ("title", JsonType::String),
    ("upload_type", JsonType::String),
    ("description", JsonType::String),
    ("creators", JsonType::Array),
    ("grants", JsonType::Array),
    ("keywords", JsonType::Array),
    ("license", JsonType::Object),
];

const CREATOR_FIELDS: &[&str] = &["affiliation", "name", "orcid"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JsonType {
    String,
    Array,
    Object,
}

impl JsonType {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Required position of specific creators.
///
/// `leading` ORCIDs open the creators list and `trailing` ORCIDs close it, in
/// the given order; everyone in between is sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorOrder {
    pub leading: Vec<String>,
    pub trailing: Vec<String>,
}

impl Default for CreatorOrder {
    fn default() -> Self {
        Self {
            leading: vec!["0000-0003-0315-7727".to_string()],
            trailing: vec![
                "0000-0003-1495-9143".to_string(),
                "0000-0003-4379-8967".to_string(),
            ],
        }
    }
}

/// A creator entry whose required fields are all present.
struct Creator<'a> {
    name: &'a str,
    orcid: &'a str,
}

/// Validate `.zenodo.json` content.
///
/// ORCID profile links are checked when a checker is given; it must not
/// follow redirects, because orcid.org redirects unknown identifiers to its
/// sign-in page instead of answering 404.
pub fn validate_zenodo(
    document: &Value,
    order: &CreatorOrder,
    checker: Option<&dyn LinkChecker>,
    options: &LinkCheckOptions,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    let Some(object) = document.as_object() else {
        report.add(Violation::new(ViolationKind::WrongType {
            expected: "object".to_string(),
            found: type_name(document).to_string(),
        }));
        return report;
    };

    check_top_level(object, &mut report);
    if !report.is_empty() {
        return report;
    }

    let creators = check_creators(object.get("creators"), &mut report);
    if report.is_empty() {
        if let Some(checker) = checker {
            check_orcid_links(&creators, checker, options, &mut report);
        }
        check_order(&creators, order, &mut report);
    }

    check_grants(object.get("grants"), &mut report);

    tracing::info!(violations = report.len(), "zenodo metadata checked");
    report
}

fn check_top_level(object: &Map<String, Value>, report: &mut ValidationReport) {
    let expected: BTreeMap<&str, JsonType> = EXPECTED_KEYS.iter().copied().collect();
    for key in object.keys() {
        if !expected.contains_key(key.as_str()) {
            report.add(Violation::keyed(
                key.as_str(),
                ViolationKind::MalformedRecord {
                    detail: "unexpected top-level key".to_string(),
                },
            ));
        }
    }
    for &(key, json_type) in EXPECTED_KEYS {
        match object.get(key) {
            None => report.add(Violation::new(ViolationKind::MissingField {
                field: key.to_string(),
            })),
            Some(value) if !json_type.matches(value) => report.add(Violation::keyed(
                key,
                ViolationKind::WrongType {
                    expected: json_type.name().to_string(),
                    found: type_name(value).to_string(),
                },
            )),
            Some(_) => {}
        }
    }
}

fn check_creators<'a>(
    creators: Option<&'a Value>,
    report: &mut ValidationReport,
) -> Vec<Creator<'a>> {
    let entries = creators.and_then(Value::as_array).map_or(&[][..], Vec::as_slice);
    let mut valid = Vec::new();
    for (idx, entry) in entries.iter().enumerate() {
        let key = format!("creators[{idx}]");
        let field = move |name: &str| {
            entry
                .get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };
        let missing: Vec<&str> = CREATOR_FIELDS
            .iter()
            .copied()
            .filter(|name| field(*name).is_none())
            .collect();
        if missing.is_empty() {
            if let (Some(name), Some(orcid)) = (field("name"), field("orcid")) {
                valid.push(Creator { name, orcid });
            }
        }
        for name in missing {
            report.add(Violation::keyed(
                key.as_str(),
                ViolationKind::MissingField {
                    field: name.to_string(),
                },
            ));
        }
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for creator in &valid {
        let count = counts.entry(creator.orcid).or_insert(0);
        *count += 1;
        if *count == 2 {
            report.add(Violation::keyed(
                creator.orcid,
                ViolationKind::DuplicateKey {
                    key: creator.orcid.to_string(),
                },
            ));
        }
    }
    valid
}

fn check_orcid_links(
    creators: &[Creator<'_>],
    checker: &dyn LinkChecker,
    options: &LinkCheckOptions,
    report: &mut ValidationReport,
) {
    let urls: Vec<String> = creators.iter().map(|creator| orcid_url(creator.orcid)).collect();
    let statuses = check_all(checker, &urls, options);
    for ((creator, url), status) in creators.iter().zip(&urls).zip(statuses) {
        if let Some(kind) = link_violation(url, status) {
            report.add(Violation::keyed(creator.orcid, kind));
        }
    }
}

fn check_order(creators: &[Creator<'_>], order: &CreatorOrder, report: &mut ValidationReport) {
    let fixed = order.leading.len() + order.trailing.len();
    if creators.len() < fixed {
        report.add(Violation::new(ViolationKind::OrderViolation {
            detail: format!(
                "{} creators listed, at least {fixed} expected",
                creators.len()
            ),
        }));
        return;
    }

    let (head, rest) = creators.split_at(order.leading.len());
    let (middle, tail) = rest.split_at(rest.len() - order.trailing.len());

    for (position, (creator, expected)) in head.iter().zip(&order.leading).enumerate() {
        if creator.orcid != expected.as_str() {
            report.add(Violation::keyed(
                creator.orcid,
                ViolationKind::OrderViolation {
                    detail: format!("creator {} must be {expected}", position + 1),
                },
            ));
        }
    }

    let tail_start = creators.len() - tail.len();
    for (offset, (creator, expected)) in tail.iter().zip(&order.trailing).enumerate() {
        if creator.orcid != expected.as_str() {
            report.add(Violation::keyed(
                creator.orcid,
                ViolationKind::OrderViolation {
                    detail: format!("creator {} must be {expected}", tail_start + offset + 1),
                },
            ));
        }
    }

    if let Some(pair) = middle.windows(2).find(|pair| pair[0].name > pair[1].name) {
        report.add(Violation::keyed(
            pair[1].orcid,
            ViolationKind::OrderViolation {
                detail: format!(
                    "'{}' must come before '{}' (creators are sorted by name)",
                    pair[1].name, pair[0].name
                ),
            },
        ));
    }
}

fn check_grants(grants: Option<&Value>, report: &mut ValidationReport) {
    let entries = grants.and_then(Value::as_array).map_or(&[][..], Vec::as_slice);
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (idx, entry) in entries.iter().enumerate() {
        let id = entry
            .get("id")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty());
        let Some(id) = id else {
            report.add(Violation::keyed(
                format!("grants[{idx}]"),
                ViolationKind::MissingField {
                    field: "id".to_string(),
                },
            ));
            continue;
        };
        let count = counts.entry(id).or_insert(0);
        *count += 1;
        if *count == 2 {
            report.add(Violation::keyed(
                id,
                ViolationKind::DuplicateKey { key: id.to_string() },
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::LinkStatus;
    use serde_json::json;

    fn creator(name: &str, orcid: &str) -> Value {
        json!({"name": name, "affiliation": "NIH", "orcid": orcid})
    }

    fn document(creators: Vec<Value>) -> Value {
        json!({
            "title": "IBEX Knowledge-Base",
            "upload_type": "dataset",
            "description": "Imaging reagents",
            "creators": creators,
            "grants": [{"id": "10.13039/100000002::ZIA"}],
            "keywords": ["imaging"],
            "license": {"id": "CC-BY-4.0"},
        })
    }

    fn small_order() -> CreatorOrder {
        CreatorOrder {
            leading: vec!["0000-0000-0000-0001".to_string()],
            trailing: vec!["0000-0000-0000-0009".to_string()],
        }
    }

    #[test]
    fn well_formed_document_passes() {
        let doc = document(vec![
            creator("Yaniv, Ziv", "0000-0000-0000-0001"),
            creator("Adams, Ann", "0000-0000-0000-0002"),
            creator("Baker, Bob", "0000-0000-0000-0003"),
            creator("Radtke, Andrea", "0000-0000-0000-0009"),
        ]);
        let report = validate_zenodo(&doc, &small_order(), None, &LinkCheckOptions::default());
        assert!(report.is_valid(), "{report:?}");
    }

    #[test]
    fn unexpected_and_mistyped_keys() {
        let mut doc = document(vec![]);
        doc["extra"] = json!(1);
        doc["keywords"] = json!("imaging");
        let report = validate_zenodo(&doc, &small_order(), None, &LinkCheckOptions::default());
        let reasons: Vec<String> = report.iter().map(ToString::to_string).collect();
        assert_eq!(
            reasons,
            vec![
                "entry 'extra': malformed record: unexpected top-level key",
                "entry 'keywords': unexpected type, expected array, found string",
            ]
        );
    }

    #[test]
    fn creators_need_all_fields_and_unique_orcids() {
        let doc = document(vec![
            creator("Yaniv, Ziv", "0000-0000-0000-0001"),
            json!({"name": "Adams, Ann", "affiliation": " ", "orcid": "0000-0000-0000-0002"}),
            creator("Baker, Bob", "0000-0000-0000-0001"),
        ]);
        let report = validate_zenodo(&doc, &small_order(), None, &LinkCheckOptions::default());
        let reasons: Vec<String> = report.iter().map(ToString::to_string).collect();
        assert_eq!(
            reasons,
            vec![
                "entry 'creators[1]': missing required field 'affiliation'",
                "entry '0000-0000-0000-0001': duplicate key '0000-0000-0000-0001'",
            ]
        );
    }

    #[test]
    fn creator_order_is_enforced() {
        let doc = document(vec![
            creator("Yaniv, Ziv", "0000-0000-0000-0001"),
            creator("Baker, Bob", "0000-0000-0000-0003"),
            creator("Adams, Ann", "0000-0000-0000-0002"),
            creator("Radtke, Andrea", "0000-0000-0000-0009"),
        ]);
        let report = validate_zenodo(&doc, &small_order(), None, &LinkCheckOptions::default());
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.violations[0].row,
            Some(kb_model::RowRef::Key("0000-0000-0000-0002".to_string()))
        );
    }

    #[test]
    fn orcid_profiles_are_checked() {
        let doc = document(vec![
            creator("Yaniv, Ziv", "0000-0000-0000-0001"),
            creator("Radtke, Andrea", "0000-0000-0000-0009"),
        ]);
        let checker = |url: &str| {
            if url.ends_with("0009") {
                LinkStatus::NotFound { code: 302 }
            } else {
                LinkStatus::Reachable
            }
        };
        let report = validate_zenodo(
            &doc,
            &small_order(),
            Some(&checker),
            &LinkCheckOptions::default(),
        );
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.violations[0].kind,
            ViolationKind::LinkNotFound {
                url: "https://orcid.org/0000-0000-0000-0009".to_string(),
                status: 302
            }
        );
    }

    #[test]
    fn grants_need_unique_ids() {
        let mut doc = document(vec![
            creator("Yaniv, Ziv", "0000-0000-0000-0001"),
            creator("Radtke, Andrea", "0000-0000-0000-0009"),
        ]);
        doc["grants"] = json!([{"id": "g1"}, {"id": ""}, {"id": "g1"}]);
        let report = validate_zenodo(&doc, &small_order(), None, &LinkCheckOptions::default());
        let reasons: Vec<String> = report.iter().map(ToString::to_string).collect();
        assert_eq!(
            reasons,
            vec![
                "entry 'grants[1]': missing required field 'id'",
                "entry 'g1': duplicate key 'g1'",
            ]
        );
    }
}
