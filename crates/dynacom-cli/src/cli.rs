use clap::{Args, Parser, Subcommand};
use dynacom::core::io::StructureFormat;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "DynaCom CLI - Gaussian network model analysis and dynamic community identification for protein structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Identify dynamic communities of a protein structure.
    Analyze(AnalyzeArgs),
    /// Download a structure from the RCSB Protein Data Bank.
    Fetch(FetchArgs),
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to the input structure file (.pdb or .cif).
    #[arg(required = true, value_name = "FILE")]
    pub file: PathBuf,

    /// Input format, overriding the file extension.
    #[arg(short, long, value_name = "pdb|cif")]
    pub format: Option<StructureFormat>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the contact cutoff between alpha-carbons, in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Restrict the analysis to one chain of the first model.
    #[arg(long, value_name = "ID")]
    pub chain: Option<String>,

    /// Cut into exactly this many communities instead of sweeping 2..=20.
    #[arg(long = "n-com", value_name = "INT")]
    pub n_communities: Option<usize>,

    /// Path of the PyMOL selection report.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Path of the community-count score table (sweep only).
    #[arg(long, value_name = "PATH")]
    pub scores: Option<PathBuf>,
}

/// Arguments for the `fetch` subcommand.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Four-character PDB identifier, e.g. 1ubq.
    #[arg(required = true, value_name = "ID")]
    pub id: String,

    /// File format to download.
    #[arg(short, long, value_name = "pdb|cif", default_value = "cif")]
    pub format: StructureFormat,

    /// Base name of the saved file; the extension is appended. Defaults to the identifier.
    #[arg(long, value_name = "NAME")]
    pub save_name: Option<String>,
}
