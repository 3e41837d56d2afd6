use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Abriss Developers",
    version,
    about = "Abriss CLI - A command-line interface for preparing and batching large pulldown screens of protein-structure-prediction jobs.",
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

    /// Set the number of threads for parallel file writing.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a multi-sequence FASTA file into one file per sequence.
    Split(SplitArgs),
    /// Cluster fold-prediction jobs into homogeneous length bins for batched inference.
    Cluster(ClusterArgs),
}

/// Arguments for the `split` subcommand.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input multi-sequence FASTA file (plain or gzip-compressed).
    #[arg(value_name = "FASTA")]
    pub fasta_file: PathBuf,

    /// Output directory for the individual FASTA files.
    #[arg(value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Write a newline-delimited list of every created file path.
    #[arg(long, value_name = "PATH")]
    pub output_list: Option<PathBuf>,
}

/// Arguments for the `cluster` subcommand.
#[derive(Args, Debug)]
pub struct ClusterArgs {
    /// Fold specifications given inline, one string per job.
    #[arg(
        long = "folds",
        value_name = "SPEC",
        num_args(1..),
        conflicts_with = "folds_file"
    )]
    pub folds: Vec<String>,

    /// Newline-delimited fold specification file.
    #[arg(short = 'f', long, value_name = "PATH")]
    pub folds_file: Option<PathBuf>,

    /// Comma-separated feature table with header identifier,seq_length,msa_depth.
    #[arg(long, required = true, value_name = "PATH")]
    pub features: PathBuf,

    /// Path to a TOML configuration file for clustering options.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the bin size used for clustering sequence lengths.
    #[arg(long, value_name = "INT")]
    pub bin_size: Option<usize>,

    /// Override the delimiter separating chains within one fold specification.
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Override the fold specification file format.
    #[arg(long, value_name = "NAME")]
    pub format: Option<String>,

    /// Path to the comma-separated cluster table to write.
    #[arg(
        short,
        long,
        default_value = "sequence_clusters.txt",
        value_name = "PATH"
    )]
    pub output: PathBuf,
}
