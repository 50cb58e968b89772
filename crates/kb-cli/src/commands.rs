use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use kb_convert::{
    write_contrib_md, write_contributors_md, write_data_software_md, write_index_md,
    write_probes_md, write_protocols_md, write_reagent_resources_md, write_supporting_md,
    write_videos_md,
};
use kb_ingest::{
    load_rule_set, load_zenodo, read_column_values, read_json, read_table, read_text,
};
use kb_model::{RuleSet, Table, ValidationReport};
use kb_validate::{
    CreatorOrder, HttpLinkChecker, LinkCheckOptions, LinkChecker, ReagentContext, validate_bibtex,
    validate_images, validate_probes, validate_reagents, validate_table, validate_videos,
    validate_zenodo,
};

use crate::cli::{
    Command, LinkArgs, ReagentResourcesArgs, ReportFormatArg, ValidateArgs, ValidateBibArgs,
    ValidateImagesArgs, ValidateProbesArgs, ValidateReagentsArgs, ValidateVideosArgs,
    ValidateZenodoArgs,
};

/// Column of the vendors file listing valid vendor names.
const VENDOR_COLUMN: &str = "Vendor";

/// What a subcommand produced.
#[derive(Debug)]
pub enum Outcome {
    Report {
        input: PathBuf,
        report: ValidationReport,
        format: ReportFormatArg,
    },
    Generated(Vec<PathBuf>),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        match self {
            Self::Report { report, .. } => report.is_valid(),
            Self::Generated(_) => true,
        }
    }
}

pub fn run(command: &Command) -> Result<Outcome> {
    match command {
        Command::Validate(args) => run_validate(args),
        Command::ValidateVideos(args) => run_validate_videos(args),
        Command::ValidateReagents(args) => run_validate_reagents(args),
        Command::ValidateImages(args) => run_validate_images(args),
        Command::ValidateProbes(args) => run_validate_probes(args),
        Command::ValidateBib(args) => run_validate_bib(args),
        Command::ValidateZenodo(args) => run_validate_zenodo(args),
        Command::ProtocolsMd(args) => generated(write_protocols_md(
            &args.template,
            &args.csv,
            &args.output_dir,
        )),
        Command::ReagentResourcesMd(args) => run_reagent_resources_md(args),
        Command::VideosMd(args) => {
            generated(write_videos_md(&args.template, &args.csv, &args.output_dir))
        }
        Command::ProbesMd(args) => {
            generated(write_probes_md(&args.template, &args.csv, &args.output_dir))
        }
        Command::DataSoftwareMd(args) => generated(write_data_software_md(
            &args.template,
            &args.datasets,
            &args.software,
            &args.output_dir,
        )),
        Command::ContributorsMd(args) => generated(write_contributors_md(
            &args.template,
            &args.zenodo,
            &args.output_dir,
        )),
        Command::ContribMd(args) => generated(write_contrib_md(
            &args.template,
            &args.data_dictionary,
            &args.glossary,
            &args.output_dir,
        )),
        Command::IndexStats(args) => {
            generated(write_index_md(&args.template, &args.csv, &args.output_dir))
        }
        Command::SupportingMd(args) => {
            let _span = info_span!("supporting", csv = %args.csv.display()).entered();
            let written = write_supporting_md(&args.template, &args.csv, &args.supporting_dir)
                .with_context(|| {
                    format!("generate supporting material from {}", args.csv.display())
                })?;
            info!(pages = written.len(), "supporting material generated");
            Ok(Outcome::Generated(written))
        }
    }
}

fn generated(result: kb_convert::Result<PathBuf>) -> Result<Outcome> {
    let path = result.context("generate markdown")?;
    Ok(Outcome::Generated(vec![path]))
}

/// Build the HTTP checker unless link checks are disabled.
fn link_checker(links: &LinkArgs, allow_redirects: bool) -> Result<Option<HttpLinkChecker>> {
    if links.skip_links {
        info!("link checks skipped");
        return Ok(None);
    }
    let options = links.options();
    let checker =
        HttpLinkChecker::new(options.timeout, allow_redirects).context("build HTTP client")?;
    Ok(Some(checker))
}

fn as_dyn(checker: Option<&HttpLinkChecker>) -> Option<&dyn LinkChecker> {
    checker.map(|checker| checker as &dyn LinkChecker)
}

fn load_inputs(csv: &Path, rules: &Path) -> Result<(Table, RuleSet)> {
    let rules = load_rule_set(rules).with_context(|| format!("load rules {}", rules.display()))?;
    let table = read_table(csv).with_context(|| format!("load {}", csv.display()))?;
    Ok((table, rules))
}

fn creator_orcids(zenodo: &Path) -> Result<Vec<String>> {
    let metadata = load_zenodo(zenodo).with_context(|| format!("load {}", zenodo.display()))?;
    Ok(metadata.orcids())
}

fn report(input: &Path, report: ValidationReport, format: ReportFormatArg) -> Outcome {
    info!(input = %input.display(), violations = report.len(), "validation finished");
    Outcome::Report {
        input: input.to_path_buf(),
        report,
        format,
    }
}

/// Vendor sites and UniProt accessions are looked up with redirects followed.
pub fn run_reagent_resources_md(args: &ReagentResourcesArgs) -> Result<Outcome> {
    let _span = info_span!("reagent_resources_md", csv = %args.csv.display()).entered();
    let checker = link_checker(&args.links, true)?;
    let path = write_reagent_resources_md(
        &args.template,
        &args.csv,
        &args.vendors,
        &args.supporting_dir,
        as_dyn(checker.as_ref()),
        &args.links.options(),
    )
    .with_context(|| format!("generate reagent resources from {}", args.csv.display()))?;
    Ok(Outcome::Generated(vec![path]))
}

pub fn run_validate(args: &ValidateArgs) -> Result<Outcome> {
    let _span = info_span!("validate", csv = %args.csv.display()).entered();
    let (table, rules) = load_inputs(&args.csv, &args.rules)?;
    let checker = link_checker(&args.links, rules.allow_redirects)?;
    let result = validate_table(&table, &rules, as_dyn(checker.as_ref()), &args.links.options());
    Ok(report(&args.csv, result, args.report.report_format))
}

pub fn run_validate_videos(args: &ValidateVideosArgs) -> Result<Outcome> {
    let _span = info_span!("validate_videos", csv = %args.csv.display()).entered();
    let (table, rules) = load_inputs(&args.csv, &args.rules)?;
    let orcids = creator_orcids(&args.zenodo)?;
    let checker = link_checker(&args.links, rules.allow_redirects)?;
    let result = validate_videos(
        &table,
        &rules,
        &orcids,
        as_dyn(checker.as_ref()),
        &args.links.options(),
    );
    Ok(report(&args.csv, result, args.report.report_format))
}

pub fn run_validate_reagents(args: &ValidateReagentsArgs) -> Result<Outcome> {
    let _span = info_span!("validate_reagents", csv = %args.csv.display()).entered();
    let (table, rules) = load_inputs(&args.csv, &args.rules)?;
    let orcids = creator_orcids(&args.zenodo)?;
    let vendors = read_column_values(&args.vendors, VENDOR_COLUMN)
        .with_context(|| format!("load vendors {}", args.vendors.display()))?;
    let context = ReagentContext {
        creator_orcids: &orcids,
        vendors: &vendors,
        supporting_root: &args.supporting_dir,
    };
    let checker = link_checker(&args.links, rules.allow_redirects)?;
    let result = validate_reagents(
        &table,
        &rules,
        &context,
        as_dyn(checker.as_ref()),
        &args.links.options(),
    )
    .with_context(|| format!("check supporting material in {}", args.supporting_dir.display()))?;
    Ok(report(&args.csv, result, args.report.report_format))
}

pub fn run_validate_images(args: &ValidateImagesArgs) -> Result<Outcome> {
    let _span = info_span!("validate_images", csv = %args.csv.display()).entered();
    let (table, rules) = load_inputs(&args.csv, &args.rules)?;
    let checker = link_checker(&args.links, rules.allow_redirects)?;
    let result = validate_images(
        &table,
        &rules,
        &args.supporting_dir,
        as_dyn(checker.as_ref()),
        &args.links.options(),
    )
    .with_context(|| format!("check image files in {}", args.supporting_dir.display()))?;
    Ok(report(&args.csv, result, args.report.report_format))
}

pub fn run_validate_probes(args: &ValidateProbesArgs) -> Result<Outcome> {
    let table = read_table(&args.csv).with_context(|| format!("load {}", args.csv.display()))?;
    Ok(report(&args.csv, validate_probes(&table), args.report.report_format))
}

pub fn run_validate_bib(args: &ValidateBibArgs) -> Result<Outcome> {
    let text = read_text(&args.bib).with_context(|| format!("load {}", args.bib.display()))?;
    Ok(report(&args.bib, validate_bibtex(&text), args.report.report_format))
}

/// Creator ORCID pages are checked without following redirects: an unknown
/// ORCID redirects to a search page that answers 200.
pub fn run_validate_zenodo(args: &ValidateZenodoArgs) -> Result<Outcome> {
    let _span = info_span!("validate_zenodo", path = %args.zenodo.display()).entered();
    let document: serde_json::Value =
        read_json(&args.zenodo).with_context(|| format!("load {}", args.zenodo.display()))?;
    let defaults = CreatorOrder::default();
    let order = CreatorOrder {
        leading: if args.leading.is_empty() {
            defaults.leading
        } else {
            args.leading.clone()
        },
        trailing: if args.trailing.is_empty() {
            defaults.trailing
        } else {
            args.trailing.clone()
        },
    };
    let checker = link_checker(&args.links, false)?;
    let options: LinkCheckOptions = args.links.options();
    let result = validate_zenodo(&document, &order, as_dyn(checker.as_ref()), &options);
    Ok(report(&args.zenodo, result, args.report.report_format))
}
