//! CLI argument definitions for the `kb` tool.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use kb_validate::LinkCheckOptions;

#[derive(Parser)]
#[command(
    name = "kb",
    version,
    about = "Validate imaging knowledge-base files and generate the site markdown",
    long_about = "Validate imaging knowledge-base files and generate the site markdown.\n\n\
                  Validators check CSV tables against JSON rule files, bibliographies and\n\
                  .zenodo.json metadata. Generators fill markdown templates from the tables."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate any CSV file against a JSON rule file.
    Validate(ValidateArgs),

    /// Validate videos.csv; contributors must be creators in .zenodo.json.
    ValidateVideos(ValidateVideosArgs),

    /// Validate reagent_resources.csv and its supporting-material pages.
    ValidateReagents(ValidateReagentsArgs),

    /// Validate image_resources.csv and the image files it lists.
    ValidateImages(ValidateImagesArgs),

    /// Check that fluorescent probe names are unique.
    ValidateProbes(ValidateProbesArgs),

    /// Validate a BibTeX bibliography.
    ValidateBib(ValidateBibArgs),

    /// Validate .zenodo.json.
    ValidateZenodo(ValidateZenodoArgs),

    /// Generate protocols.md.
    ProtocolsMd(SingleTableArgs),

    /// Generate reagent_resources.md with supporting-material, UniProt and vendor links.
    ReagentResourcesMd(ReagentResourcesArgs),

    /// Generate videos.md (general and tutorial tables).
    VideosMd(SingleTableArgs),

    /// Generate fluorescent_probes.md.
    ProbesMd(SingleTableArgs),

    /// Generate the datasets and software page.
    DataSoftwareMd(DataSoftwareArgs),

    /// Generate the contributor list from .zenodo.json.
    ContributorsMd(ContributorsArgs),

    /// Generate the contribution page from the data dictionary and glossary.
    ContribMd(ContribArgs),

    /// Fill the landing-page counters from reagent_resources.csv.
    IndexStats(SingleTableArgs),

    /// Create supporting-material pages from a batch CSV file.
    SupportingMd(SupportingArgs),
}

/// Link checking flags shared by validating subcommands.
#[derive(Args, Clone, Debug)]
pub struct LinkArgs {
    /// Concurrent link checks.
    #[arg(long = "workers", default_value_t = 4)]
    pub workers: usize,

    /// Retries per link after a failed check.
    #[arg(long = "retries", default_value_t = 0)]
    pub retries: u32,

    /// Per-request timeout in seconds.
    #[arg(long = "timeout-secs", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Do not check URL or DOI reachability.
    #[arg(long = "skip-links")]
    pub skip_links: bool,
}

impl LinkArgs {
    pub fn options(&self) -> LinkCheckOptions {
        LinkCheckOptions {
            workers: self.workers.max(1),
            retries: self.retries,
            timeout: Duration::from_secs(self.timeout_secs),
            ..LinkCheckOptions::default()
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct ReportArgs {
    /// How violations are printed.
    #[arg(long = "report-format", value_enum, default_value = "text")]
    pub report_format: ReportFormatArg,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// CSV file to validate.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// JSON rule file.
    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    #[command(flatten)]
    pub links: LinkArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args)]
pub struct ValidateVideosArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    /// .zenodo.json listing every contributor ORCID.
    #[arg(value_name = "ZENODO_JSON")]
    pub zenodo: PathBuf,

    #[command(flatten)]
    pub links: LinkArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args)]
pub struct ValidateReagentsArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    #[arg(value_name = "ZENODO_JSON")]
    pub zenodo: PathBuf,

    /// CSV file with the valid vendor names in a column titled "Vendor".
    #[arg(value_name = "VENDORS_CSV")]
    pub vendors: PathBuf,

    /// Supporting-material root directory.
    #[arg(value_name = "SUPPORTING_DIR")]
    pub supporting_dir: PathBuf,

    #[command(flatten)]
    pub links: LinkArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args)]
pub struct ValidateImagesArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    /// Supporting-material root directory holding the image files.
    #[arg(value_name = "SUPPORTING_DIR")]
    pub supporting_dir: PathBuf,

    #[command(flatten)]
    pub links: LinkArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args)]
pub struct ValidateProbesArgs {
    /// CSV file with a "Fluorescent Probe" column.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args)]
pub struct ValidateBibArgs {
    /// Bibliography in BibTeX format.
    #[arg(value_name = "BIB")]
    pub bib: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args)]
pub struct ValidateZenodoArgs {
    #[arg(value_name = "ZENODO_JSON")]
    pub zenodo: PathBuf,

    /// ORCIDs that must open the creator list (replaces the default).
    #[arg(long = "leading-orcid", value_name = "ORCID")]
    pub leading: Vec<String>,

    /// ORCIDs that must close the creator list (replaces the default).
    #[arg(long = "trailing-orcid", value_name = "ORCID")]
    pub trailing: Vec<String>,

    #[command(flatten)]
    pub links: LinkArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Template, one input file, output directory.
#[derive(Args)]
pub struct SingleTableArgs {
    /// Markdown template (`*.md.in`).
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Directory receiving the generated file.
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,
}

#[derive(Args)]
pub struct ReagentResourcesArgs {
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// CSV file mapping vendor names to web sites (columns "Vendor", "URL").
    #[arg(value_name = "VENDORS_CSV")]
    pub vendors: PathBuf,

    /// Supporting-material root; the page is written to its parent.
    #[arg(value_name = "SUPPORTING_DIR")]
    pub supporting_dir: PathBuf,

    // `--skip-links` links UniProt accessions and vendor sites unchecked.
    #[command(flatten)]
    pub links: LinkArgs,
}

#[derive(Args)]
pub struct DataSoftwareArgs {
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    #[arg(value_name = "DATASETS_CSV")]
    pub datasets: PathBuf,

    #[arg(value_name = "SOFTWARE_CSV")]
    pub software: PathBuf,

    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,
}

#[derive(Args)]
pub struct ContributorsArgs {
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    #[arg(value_name = "ZENODO_JSON")]
    pub zenodo: PathBuf,

    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,
}

#[derive(Args)]
pub struct ContribArgs {
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    #[arg(value_name = "DATA_DICTIONARY_CSV")]
    pub data_dictionary: PathBuf,

    #[arg(value_name = "GLOSSARY_CSV")]
    pub glossary: PathBuf,

    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,
}

#[derive(Args)]
pub struct SupportingArgs {
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Batch CSV; publication `.md` files are read from its directory.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Supporting-material root directory receiving the pages.
    #[arg(value_name = "SUPPORTING_DIR")]
    pub supporting_dir: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_flags_build_options() {
        let cli = Cli::try_parse_from([
            "kb",
            "validate",
            "videos.csv",
            "rules.json",
            "--workers",
            "8",
            "--retries",
            "2",
            "--timeout-secs",
            "3",
        ])
        .unwrap();
        let Command::Validate(args) = cli.command else {
            panic!("expected validate subcommand");
        };
        let options = args.links.options();
        assert_eq!(options.workers, 8);
        assert_eq!(options.retries, 2);
        assert_eq!(options.timeout, Duration::from_secs(3));
        assert!(!args.links.skip_links);
        assert_eq!(args.report.report_format, ReportFormatArg::Text);
    }

    #[test]
    fn reagent_resources_takes_link_flags() {
        let cli = Cli::try_parse_from([
            "kb",
            "reagent-resources-md",
            "reagent_resources.md.in",
            "reagent_resources.csv",
            "vendors.csv",
            "site/supporting_material",
            "--skip-links",
        ])
        .unwrap();
        let Command::ReagentResourcesMd(args) = cli.command else {
            panic!("expected reagent-resources-md subcommand");
        };
        assert_eq!(args.vendors, PathBuf::from("vendors.csv"));
        assert!(args.links.skip_links);
    }

    #[test]
    fn zenodo_order_flags_repeat() {
        let cli = Cli::try_parse_from([
            "kb",
            "validate-zenodo",
            ".zenodo.json",
            "--leading-orcid",
            "0000-0001-0000-0001",
            "--trailing-orcid",
            "0000-0002-0000-0002",
            "--trailing-orcid",
            "0000-0003-0000-0003",
            "--skip-links",
        ])
        .unwrap();
        let Command::ValidateZenodo(args) = cli.command else {
            panic!("expected validate-zenodo subcommand");
        };
        assert_eq!(args.leading.len(), 1);
        assert_eq!(args.trailing.len(), 2);
        assert!(args.links.skip_links);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
